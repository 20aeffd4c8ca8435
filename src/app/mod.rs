// Applications linked into the binary. Each one exposes a factory that the
// registry knows by name.

pub mod echo;
