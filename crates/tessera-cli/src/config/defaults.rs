use tessera::core::models::mesh::DEFAULT_MESH_TYPE;

pub struct DefaultsConfig {
    pub timestep: u64,
    pub mesh_types: Vec<String>,
    pub first: u64,
    pub stride: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timestep: 0,
            mesh_types: vec![DEFAULT_MESH_TYPE.to_string()],
            first: 0,
            stride: 1,
        }
    }
}
