fn main() {
    // shown in the page footer
    let now = chrono::Utc::now();
    println!("cargo:rustc-env=BUILD_TIME={}", now.format("%Y-%m-%d %H:%M UTC"));
    println!("cargo:rustc-env=BUILD_YEAR={}", now.format("%Y"));
    println!("cargo:rerun-if-changed=build.rs");
}
