// Presence-tracked bookmark builder
pub mod bookmark;

// Versioned script callback dispatch
pub mod callback;

// Configuration loading
pub mod config;

// Line commands for the stdin console
pub mod console;
