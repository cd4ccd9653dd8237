fn main() {
    // Release pipelines may override the reported version with DEVGUARD_VERSION
    let version = std::env::var("DEVGUARD_VERSION")
        .or_else(|_| std::env::var("CARGO_PKG_VERSION"))
        .unwrap_or_else(|_| "0.0.0".to_string());
    println!("cargo:rustc-env=DEVGUARD_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=DEVGUARD_VERSION");
}
