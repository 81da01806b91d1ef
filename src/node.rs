//! node contract metadata published to the hosting graph runtime.
//!
//! the host owns registration, discovery and routing; this crate only
//! declares what each node consumes and produces so the host can wire it.

/// value types exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `(batch, height, width, channels)` frame data.
    Image,
    /// `(height, width)`-shaped mask data, optionally batched.
    Mask,
    /// a scalar control.
    Float,
    /// free-form text.
    Text,
}

/// range and default metadata for a scalar control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatControl {
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// one declared input of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub required: bool,
    /// present only for [`ValueKind::Float`] inputs.
    pub control: Option<FloatControl>,
    /// present only for [`ValueKind::Text`] inputs with a default.
    pub default_text: Option<&'static str>,
}

impl InputSpec {
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            control: None,
            default_text: None,
        }
    }

    pub const fn optional(name: &'static str, kind: ValueKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub const fn with_control(self, control: FloatControl) -> Self {
        Self {
            control: Some(control),
            ..self
        }
    }

    pub const fn with_default_text(self, text: &'static str) -> Self {
        Self {
            default_text: Some(text),
            ..self
        }
    }
}

/// one declared output of a node. outputs are positional: the execution entry
/// point returns them in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// static description of a node: a stable string identifier plus its declared
/// inputs and ordered outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDescriptor {
    pub id: &'static str,
    pub inputs: &'static [InputSpec],
    pub outputs: &'static [OutputSpec],
}

/// implemented by every component the host can register.
pub trait NodeContract {
    fn descriptor() -> &'static NodeDescriptor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameSelector, MaskBoundingBoxExtractor};

    #[test]
    fn frame_selector_descriptor_declares_fill_range() {
        let descriptor = FrameSelector::descriptor();
        assert_eq!(descriptor.id, "IndexSelector");

        let fill = descriptor
            .inputs
            .iter()
            .find(|input| input.name == "empty_frame_level")
            .unwrap();
        let control = fill.control.unwrap();
        assert_eq!(control.min, 0.0);
        assert_eq!(control.max, 1.0);
        assert_eq!(control.step, 0.01);
        assert_eq!(control.default, 0.0);
    }

    #[test]
    fn frame_selector_descriptor_marks_inpaint_mask_optional() {
        let descriptor = FrameSelector::descriptor();
        let mask = descriptor
            .inputs
            .iter()
            .find(|input| input.name == "inpaint_mask")
            .unwrap();
        assert!(!mask.required);
        assert_eq!(mask.kind, ValueKind::Mask);
        assert_eq!(descriptor.outputs.len(), 2);
    }

    #[test]
    fn bbox_descriptor_outputs_text() {
        let descriptor = MaskBoundingBoxExtractor::descriptor();
        assert_eq!(descriptor.id, "MaskToBoundingBox");
        assert_eq!(descriptor.inputs.len(), 1);
        assert_eq!(descriptor.outputs[0].kind, ValueKind::Text);
    }
}
