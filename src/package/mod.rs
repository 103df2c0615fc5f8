pub mod assets;
pub mod export;
pub mod import;
pub mod manifest;


pub use assets::{
    sanitize_asset_name,
    to_data_url,
    DataUrl,
};
pub use export::{
    bundle_file_name,
    export_course,
    export_to_dir,
    ExportOptions,
};
pub use import::{
    load_package,
    load_package_bytes,
    load_package_file,
    ImportedPackage,
};
pub use manifest::{
    DataFile,
    Manifest,
    PACKAGE_FORMAT,
};
