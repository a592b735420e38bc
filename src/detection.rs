use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;

/// Recognized plate string together with its OCR confidence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlateReading {
    pub text: String,
    #[serde(rename = "p")]
    pub confidence: f32,
}

/// One detector output for a frame: a vehicle/plate box, optionally with a
/// plate readout attached by the OCR stage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox,
    pub plate: Option<PlateReading>,
}

impl Detection {
    #[inline]
    pub fn new(bbox: BBox) -> Self {
        Self { bbox, plate: None }
    }

    #[inline]
    pub fn with_plate(bbox: BBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            plate: Some(PlateReading {
                text: text.into(),
                confidence,
            }),
        }
    }

    /// Non-empty plate text of this detection, if any.
    #[inline]
    pub fn plate_text(&self) -> Option<&str> {
        match &self.plate {
            Some(p) if !p.text.is_empty() => Some(&p.text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_detection_dump_line() {
        let line = r#"[{"bbox":{"x":10.0,"y":20.0,"w":80.0,"h":40.0},"plate":{"text":"AB123CD","p":0.87}},{"bbox":{"x":300.0,"y":40.0,"w":60.0,"h":30.0},"plate":null}]"#;
        let dets: Vec<Detection> = serde_json::from_str(line).unwrap();

        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].plate_text(), Some("AB123CD"));
        assert_eq!(dets[1].plate_text(), None);
        assert_eq!(dets[1].bbox, BBox::new(300., 40., 60., 30.));
    }
}
