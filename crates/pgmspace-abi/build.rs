use std::env;
use std::fs;
use std::path::Path;

use pgmspace_core::RegionLayout;

fn main() {
    println!("cargo:rerun-if-env-changed=PGMSPACE_REGION_BASE");
    println!("cargo:rerun-if-changed=build.rs");

    let raw = env::var("PGMSPACE_REGION_BASE").unwrap_or_else(|_| "esp8266".to_string());
    let layout = RegionLayout::parse(&raw)
        .unwrap_or_else(|err| panic!("PGMSPACE_REGION_BASE={raw:?}: {err}"));

    let out_dir = env::var("OUT_DIR").unwrap();
    let generated = format!(
        "/// Region base baked in at build time from `PGMSPACE_REGION_BASE`.\n\
         pub const DEFAULT_REGION_BASE: usize = {:#x};\n",
        layout.base()
    );
    fs::write(Path::new(&out_dir).join("region_base.rs"), generated).unwrap();
}
