use crate::{
    eval::evaluator::{PageFrame, SectionFrame},
    foundation::math::Fnv1a64,
    pinned::story::{FadeStyle, PinState},
    style::css::{ClipInset, Display},
};

/// Hash of everything a frame paints. Progress and timeline clocks are excluded, so frames
/// that differ only in scroll position but look identical hash equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FrameFingerprint(pub u64);

pub fn fingerprint_frame(frame: &PageFrame) -> FrameFingerprint {
    let mut h = Fnv1a64::new_default();
    h.write_u64(frame.sections.len() as u64);
    for section in &frame.sections {
        h.write_str(&section.id);
        write_section(&mut h, &section.frame);
    }
    FrameFingerprint(h.finish())
}

fn write_section(h: &mut Fnv1a64, frame: &SectionFrame) {
    match frame {
        SectionFrame::CardDeck(deck) => {
            h.write_u8(0);
            h.write_u64(deck.cards.len() as u64);
            for card in &deck.cards {
                h.write_f64(card.opacity);
                h.write_f64(card.scale);
                h.write_f64(card.translate_y.0);
                h.write_f64(card.blur.0);
                h.write_u8(match card.display {
                    Display::Flex => 1,
                    Display::None => 0,
                });
            }
            h.write_f64(deck.progress_bar.height.0);
        }
        SectionFrame::PinnedStory { pin, story } => {
            h.write_u8(1);
            // A pinned section is fixed on screen; its compensating offset is not visible.
            h.write_u8(match pin {
                PinState::Before => 0,
                PinState::Pinned { .. } => 1,
                PinState::After => 2,
            });
            write_clip(h, &story.image.clip);
            h.write_f64(story.image.scale);
            h.write_f64(story.image.filter.grayscale.0);
            h.write_f64(story.image.filter.brightness);
            write_fade(h, &story.content);
            for (_, item) in &story.items {
                write_fade(h, item);
            }
        }
        SectionFrame::ScrollTransform(value) => {
            h.write_u8(2);
            h.write_f64(value.value);
        }
        SectionFrame::Reveal { in_view, children } => {
            h.write_u8(3);
            h.write_u8(u8::from(*in_view));
            for child in children {
                h.write_f64(child.opacity);
                h.write_f64(child.translate.x);
                h.write_f64(child.translate.y);
            }
        }
    }
}

fn write_clip(h: &mut Fnv1a64, clip: &ClipInset) {
    for v in [clip.top.0, clip.right.0, clip.bottom.0, clip.left.0, clip.radius.0] {
        h.write_f64(v);
    }
}

fn write_fade(h: &mut Fnv1a64, fade: &FadeStyle) {
    h.write_f64(fade.opacity);
    h.write_f64(fade.translate_y.0);
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
