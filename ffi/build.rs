use std::path::PathBuf;

/// Generate `include/chttp.h` for C hosts.
fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let include_dir = crate_dir.join("include");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CHTTP_H")
        .with_documentation(true)
        .generate();

    match bindings {
        Ok(bindings) => {
            if let Err(err) = std::fs::create_dir_all(&include_dir) {
                println!("cargo:warning=cannot create {}: {err}", include_dir.display());
                return;
            }
            bindings.write_to_file(include_dir.join("chttp.h"));
        }
        Err(err) => println!("cargo:warning=header generation skipped: {err}"),
    }
}
