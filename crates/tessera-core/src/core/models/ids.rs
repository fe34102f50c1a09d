use slotmap::new_key_type;

new_key_type! {
    /// Handle to a force contributor registered with a `ForceSet`.
    pub struct ForceId;
}
