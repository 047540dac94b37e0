pub mod assets;

pub use assets::serve_asset;
