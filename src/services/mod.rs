// Bookmark sync services
// Services provide import parsing, tree building, the import pipeline and settings.

pub mod html_importer;
pub mod import_pipeline;
pub mod json_importer;
pub mod settings_engine;
pub mod tree_builder;
