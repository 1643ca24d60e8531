use slotmap::new_key_type;

new_key_type! {
    /// Identifies a tank inside the engine's active set.
    ///
    /// Keys are generational: a key for a tank that has become full and been
    /// removed never resolves to a different tank later.
    pub struct TankId;
}
