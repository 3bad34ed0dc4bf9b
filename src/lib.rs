// cartesian closed kernel: types, morphisms, evaluation
pub mod kernel;
// context chains and the projection resolver
pub mod resolver;
// term construction on top of kernel + resolver
pub mod dsl;
// lambda calculus surface
pub mod surface;
// string -> surface
pub mod parser;
// surface -> categorical terms (every variable goes through the resolver)
pub mod elaborator;
// display impls
pub mod printing;
