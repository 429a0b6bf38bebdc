use serde::Serialize;

/// One finding of the layout analyzer. Serialized with a `type` discriminant
/// followed by `description` and the variant's own fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Element {
    #[serde(rename = "texto_principal")]
    MainText {
        description: &'static str,
        position: MainTextPosition,
    },
    #[serde(rename = "texto_secundário")]
    SecondaryText {
        description: &'static str,
        position: RelativePosition,
    },
    #[serde(rename = "fundo")]
    Background {
        description: &'static str,
        coverage: String,
    },
    #[serde(rename = "borda")]
    Border {
        description: &'static str,
        position: BorderExtent,
    },
    #[serde(rename = "efeito")]
    Effect { description: &'static str },
    #[serde(rename = "objeto")]
    Object {
        description: &'static str,
        position: ObjectPosition,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MainTextPosition {
    #[serde(rename = "centro")]
    Center,
    #[serde(rename = "lateral")]
    Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelativePosition {
    #[serde(rename = "acima")]
    Above,
    #[serde(rename = "abaixo")]
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BorderExtent {
    #[serde(rename = "completa")]
    Complete,
    #[serde(rename = "parcial")]
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectPosition {
    #[serde(rename = "inferior")]
    Lower,
}

impl Element {
    pub fn main_text(position: MainTextPosition) -> Self {
        Element::MainText {
            description: "Texto principal em cor clara",
            position,
        }
    }

    pub fn secondary_text(position: RelativePosition) -> Self {
        Element::SecondaryText {
            description: "Texto secundário em cor clara",
            position,
        }
    }

    /// `fraction` is the dark share of the image in `0.0..=1.0`.
    pub fn background(fraction: f64) -> Self {
        Element::Background {
            description: "Fundo escuro predominante",
            coverage: format_coverage(fraction),
        }
    }

    pub fn border(position: BorderExtent) -> Self {
        Element::Border {
            description: "Borda retangular",
            position,
        }
    }

    pub fn effect() -> Self {
        Element::Effect {
            description: "Efeito de iluminação ou gradiente detectado",
        }
    }

    pub fn object() -> Self {
        Element::Object {
            description: "Livro aberto em destaque",
            position: ObjectPosition::Lower,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::MainText { .. } => "texto_principal",
            Element::SecondaryText { .. } => "texto_secundário",
            Element::Background { .. } => "fundo",
            Element::Border { .. } => "borda",
            Element::Effect { .. } => "efeito",
            Element::Object { .. } => "objeto",
        }
    }
}

pub(crate) fn format_coverage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
