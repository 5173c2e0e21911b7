//! Shared helpers for the integration tests.

use typelens::reflect::Reflector;

/// A reflector preloaded with the given PHP source.
pub fn reflector_for(source: &str) -> Reflector {
    let reflector = Reflector::new();
    reflector.add_source(source);
    reflector
}

/// Render the resolved type of a facet pair as notation text.
#[allow(dead_code)]
pub fn shown(facets: &typelens::reflect::TypeFacets) -> String {
    facets.resolved().to_string()
}
