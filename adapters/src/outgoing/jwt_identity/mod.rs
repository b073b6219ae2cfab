pub mod identity_verifier_jwt;
