// Library crate: the headless annotation engine, exposed for integration tests
// and scripted sessions. Window, renderer and panels live in the binary crate.

pub mod bounds;
pub mod command;
pub mod controller;
pub mod error;
pub mod harness;
pub mod marker;
pub mod scene;
pub mod state;
pub mod surface;

/// CPU mesh data and ray casting, shared with the binary's renderer and picker.
pub mod viewport {
    pub mod mesh;
    pub mod picking;
}
