// fltk's bundled build links Xinerama, Xcursor and Xfixes on Linux. Hosts
// without those dev packages (CI runners, containers running the unit tests)
// get empty static stubs so the chat client and its tests still link.

use std::env;
use std::path::Path;
use std::process::Command;

/// pkg-config name and link name of each X11 extension fltk pulls in.
const X11_EXTENSIONS: [(&str, &str); 3] = [
    ("xinerama", "Xinerama"),
    ("xcursor", "Xcursor"),
    ("xfixes", "Xfixes"),
];

fn has_system_lib_via_pkg_config(name: &str) -> bool {
    Command::new("pkg-config")
        .args(["--exists", name])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn build_empty_stub(out_dir: &Path, lib_name: &str) {
    let src = out_dir.join(format!("{}_stub.c", lib_name));
    std::fs::write(&src, "void sql_chat_x11_stub(void) {}\n").expect("write stub source");

    let mut build = cc::Build::new();
    build.file(&src);
    build.warnings(false);
    build.compile(lib_name);
}

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").ok().as_deref() != Some("linux") {
        return;
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR");
    let out_path = Path::new(&out_dir);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    let mut stubbed = false;
    for (pkg, lib_name) in X11_EXTENSIONS {
        if !has_system_lib_via_pkg_config(pkg) {
            build_empty_stub(out_path, lib_name);
            stubbed = true;
        }
    }

    if stubbed {
        println!("cargo:warning=sql_chat: X11 extension libs not found via pkg-config, linking empty stubs");
        println!("cargo:rustc-link-search=native={}", out_path.display());
    }
}
