pub mod filter;
pub mod generator;
pub mod scripts;
pub mod worker;

pub use filter::CharacterFilter;
pub use generator::{
    generate_characters,
    CharsetRequest,
};
pub use scripts::{
    scripts_for_language,
    supported_languages,
    Script,
};
pub use worker::{
    CharsetJob,
    CharsetUpdate,
};
