use slotmap::new_key_type;

// Strongly-typed handles. Copyable and shared freely between nodes; a handle
// whose asset was removed simply resolves to `None`.
new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
}
