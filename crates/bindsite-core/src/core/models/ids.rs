//! Arena keys into the slot maps owned by a [`Structure`](super::structure::Structure).
//!
//! Keys stay valid for the lifetime of the structure that issued them; a key from one
//! structure must not be used to index another.

use slotmap::new_key_type;

new_key_type! {
    pub struct AtomId;
    pub struct ResidueId;
    pub struct ChainId;
}
