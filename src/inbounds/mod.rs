/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - api_error                                            |
/// |   - dtos                                                 |
/// |   - handlers                                             |
/// +----------------------------------------------------------+

/// Error types for the command layer.
pub mod api_error;

/// Commands accepted by the exchange and the responses it gives back.
pub mod dtos;

/// Handlers applying commands to the engine.
pub mod handlers;
