use serde::{Deserialize, Serialize};

/// What produced a moment: a transcript line, a labelled scene, detected
/// faces, or a plain shot window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentKind {
    Speech,
    Visual,
    Faces,
    Shot,
}

impl MomentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentKind::Speech => "speech",
            MomentKind::Visual => "visual",
            MomentKind::Faces => "faces",
            MomentKind::Shot => "shot",
        }
    }
}

impl std::str::FromStr for MomentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "speech" => Ok(MomentKind::Speech),
            "visual" => Ok(MomentKind::Visual),
            "faces" => Ok(MomentKind::Faces),
            "shot" => Ok(MomentKind::Shot),
            other => Err(format!("Unknown moment content type: {}", other)),
        }
    }
}

impl std::fmt::Display for MomentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
