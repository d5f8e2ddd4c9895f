//! Best-effort collection of Kubernetes/OpenShift cluster state (resource
//! manifests as YAML, pod container logs) into a directory tree, for
//! post-mortem debugging of test runs.
//!
//! The library surface is what a test framework hooks into:
//! [`paths::test_data_dir`] to derive the per-test output directory, and the
//! `collector` functions to dump resources into it. The binary wraps the same
//! functions for manual collection.

pub mod cli;
pub mod collector;
pub mod config;
pub mod kinds;
pub mod kubernetes;
pub mod paths;
pub mod writer;
