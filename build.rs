fn main() {
    println!("cargo:rerun-if-env-changed=CONDA_PREFIX");
    // RDKit usually lives in a conda env; let the test and run binaries find
    // its libpython there. Outside of conda the system python is used.
    if let Ok(prefix) = std::env::var("CONDA_PREFIX") {
        println!("cargo:rustc-env=LD_LIBRARY_PATH={prefix}/lib");
    }
}
