//! Basic example of using the string set engine

use stringsets_core::{InMemoryStore, SetStore, Solver};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = InMemoryStore::new();

    // Upload the three sets from the classic illustration
    for words in [
        vec!["foo", "oomph", "hgf"],
        vec!["hij", "jkl", "jkm", "lmn"],
        vec!["abc", "cde", "cdf", "fuf", "fgh"],
    ] {
        let id = store.upload(words.into_iter().map(String::from).collect())?;
        println!("Uploaded set {}: {:?}", id, store.get(id)?.as_slice());
    }

    println!("\nMost common: {:?}", store.most_common()?);
    println!("Longest: {:?}", store.longest()?);

    // Solve
    let outcome = store.longest_chain(&Solver::new())?;
    println!("\nLongest chain ({} strings):", outcome.chain.len());
    for (i, link) in outcome.chain.links().iter().enumerate() {
        if Some(i) == outcome.chain.switch_index() {
            println!("  -- switch --");
        }
        println!("  {} (set {})", link.value, link.set_id);
    }

    Ok(())
}
