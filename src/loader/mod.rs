pub mod interface;
pub mod local;

pub use interface::TemplateSource;
pub use local::FilesystemTemplates;
