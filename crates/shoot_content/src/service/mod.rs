//! Use-case layer over the template repository.

pub mod template_service;
