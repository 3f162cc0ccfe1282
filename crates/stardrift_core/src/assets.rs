//! Asteroid model loading
//!
//! Model acquisition is an ordered list of loader strategies tried in
//! sequence; the first success wins. Exhausting the list is not fatal:
//! a procedurally generated placeholder (a jittered icosahedron) is used
//! instead, so gameplay always starts even with no assets on disk.
//!
//! The simulation treats the resulting template as opaque; the renderer
//! clones it per entity.

use rand::Rng;
use rand::SeedableRng;
use thiserror::Error;

/// Asset loading errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparseable model data
    #[error("malformed model data: {0}")]
    Malformed(String),

    /// Model contained no geometry
    #[error("model is empty")]
    Empty,
}

/// Prefabricated visual template for one entity type
#[derive(Debug, Clone)]
pub struct ModelTemplate {
    /// Where the template came from (loader name or "procedural")
    pub source: String,

    /// Vertex positions
    pub vertices: Vec<[f32; 3]>,

    /// Triangle indices
    pub indices: Vec<u32>,
}

/// One strategy for producing a model template
pub trait ModelLoader {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Attempt the load
    fn load(&self) -> Result<ModelTemplate, AssetError>;
}

/// Loads a minimal OBJ subset (`v` and triangulated `f` lines) from disk
#[derive(Debug)]
pub struct ObjFileLoader {
    /// Path to the .obj file
    pub path: String,
}

impl ModelLoader for ObjFileLoader {
    fn name(&self) -> &str {
        &self.path
    }

    fn load(&self) -> Result<ModelTemplate, AssetError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_no, line) in contents.lines().enumerate() {
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let mut coord = [0.0f32; 3];
                    for slot in &mut coord {
                        *slot = parts
                            .next()
                            .and_then(|p| p.parse().ok())
                            .ok_or_else(|| {
                                AssetError::Malformed(format!("bad vertex at line {}", line_no + 1))
                            })?;
                    }
                    vertices.push(coord);
                }
                Some("f") => {
                    for part in parts {
                        // "f 1/2/3" style references; only the position index matters
                        let index: u32 = part
                            .split('/')
                            .next()
                            .and_then(|p| p.parse().ok())
                            .ok_or_else(|| {
                                AssetError::Malformed(format!("bad face at line {}", line_no + 1))
                            })?;
                        indices.push(index.saturating_sub(1)); // OBJ is 1-based
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(AssetError::Empty);
        }

        Ok(ModelTemplate {
            source: self.path.clone(),
            vertices,
            indices,
        })
    }
}

/// Ordered fallback chain of model loaders
pub struct ModelProvider {
    loaders: Vec<Box<dyn ModelLoader>>,
}

impl ModelProvider {
    /// Create a provider with the given strategies, tried in order
    pub fn new(loaders: Vec<Box<dyn ModelLoader>>) -> Self {
        Self { loaders }
    }

    /// Default asteroid lookup paths
    pub fn default_asteroid() -> Self {
        Self::new(vec![
            Box::new(ObjFileLoader {
                path: "assets/models/asteroid.obj".to_string(),
            }),
            Box::new(ObjFileLoader {
                path: "assets/asteroid.obj".to_string(),
            }),
        ])
    }

    /// Try each loader in order; fall back to procedural geometry when
    /// every strategy fails. Never errors.
    pub fn load(&self, seed: u64) -> ModelTemplate {
        for loader in &self.loaders {
            match loader.load() {
                Ok(template) => {
                    log::info!("loaded asteroid model from {}", loader.name());
                    return template;
                }
                Err(e) => {
                    log::debug!("model loader {} failed: {e}", loader.name());
                }
            }
        }

        log::info!("all model loaders failed; using procedural asteroid");
        procedural_asteroid(seed)
    }
}

/// Procedurally generated placeholder asteroid: an icosahedron with
/// radius jitter so no two look identical
pub fn procedural_asteroid(seed: u64) -> ModelTemplate {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;

    let base: [[f32; 3]; 12] = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ];

    let vertices = base
        .iter()
        .map(|v| {
            let jitter = rng.gen_range(0.8..=1.2);
            let mag = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            [
                v[0] / mag * jitter,
                v[1] / mag * jitter,
                v[2] / mag * jitter,
            ]
        })
        .collect();

    let indices = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
        1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
        3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
        4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
    ];

    ModelTemplate {
        source: "procedural".to_string(),
        vertices,
        indices,
    }
}
