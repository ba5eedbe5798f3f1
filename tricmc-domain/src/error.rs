use thiserror::Error;

/// Raised when a requested number of domain divisions on some axis leaves no room for an
/// active (non-ghost) region: the ghost layers needed to keep subdomains race-free would eat
/// the whole subdomain width.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "domain decomposition on axis {axis} is too narrow: domain width {domain_width}, \
     ghost layer width {ghost_layer_width}, neighbour grid cell size {ng_cell_size}"
)]
pub struct TooNarrowDomainError {
    pub axis: usize,
    pub domain_width: f64,
    pub ghost_layer_width: f64,
    pub ng_cell_size: f64,
}
