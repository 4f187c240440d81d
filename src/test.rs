//! Shared helpers for the per-variant test modules.
