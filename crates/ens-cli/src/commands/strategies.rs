use std::error::Error;

use ens_gen::global;

pub fn run() -> Result<(), Box<dyn Error>> {
    let registries = global();
    for name in registries.permutations.names() {
        println!("permutation {name}");
    }
    for name in registries.combinations.names() {
        println!("combination {name}");
    }
    Ok(())
}
