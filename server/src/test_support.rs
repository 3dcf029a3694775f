//! Fixtures shared by unit tests.

use crate::catalog::ModelDescriptor;
use std::path::Path;

/// `cat` is closest to `kitten`, then `Cat`, then `dog`; `car` and `truck` are unrelated.
pub const ANIMALS: &str = "\
6 3
cat 1.0 0.0 0.0
Cat 0.98 0.02 0.0
dog 0.9 0.1 0.0
kitten 0.99 0.0 0.01
car 0.0 1.0 0.0
truck 0.0 0.9 0.1
";

pub const VEHICLES: &str = "\
3 2
car 1.0 0.0
truck 0.9 0.1
bike 0.1 0.9
";

/// Write a model file into `dir` and return its (inactive) descriptor.
pub fn write_model(dir: &Path, filename: &str, contents: &str) -> ModelDescriptor {
    let location = dir.join(filename);
    std::fs::write(&location, contents).unwrap();
    ModelDescriptor::new(filename, location)
}
