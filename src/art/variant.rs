//! Augmented copies written next to each art crop.

/// Which copy of a card's art a file holds.
///
/// Every variant shares the label of the card it was cut from, so the
/// dataset assembler strips the prefix before looking the card up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtVariant {
    /// The plain crop.
    Original,
    /// Horizontal mirror.
    Flip,
    /// Blurred crop.
    Blur,
    /// Blurred mirror.
    BlurFlip,
}

impl ArtVariant {
    /// All variants, most specific prefix first.
    pub const ALL: [ArtVariant; 4] = [
        ArtVariant::BlurFlip,
        ArtVariant::Blur,
        ArtVariant::Flip,
        ArtVariant::Original,
    ];

    /// Filename prefix for this variant.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            ArtVariant::Original => "",
            ArtVariant::Flip => "flip_",
            ArtVariant::Blur => "blur_",
            ArtVariant::BlurFlip => "blur_flip_",
        }
    }

    /// Output filename for a scan filename.
    #[must_use]
    pub fn file_name(self, scan_name: &str) -> String {
        format!("{}{}", self.prefix(), scan_name)
    }

    /// Split an art filename into its variant and the scan filename.
    #[must_use]
    pub fn parse(file_name: &str) -> (ArtVariant, &str) {
        for variant in Self::ALL {
            if let Some(rest) = file_name.strip_prefix(variant.prefix()) {
                if variant == ArtVariant::Original || !rest.is_empty() {
                    return (variant, rest);
                }
            }
        }
        (ArtVariant::Original, file_name)
    }
}
