//! Build script for the embedded schema.
//!
//! `sqlx::migrate!` embeds `migrations/` at compile time, so cargo has to
//! rebuild whenever a migration file is added or edited.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
