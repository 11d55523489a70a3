//! Timeline widget showing flagged hazard intervals.
//!
//! Renders each labelled period as a colored bar positioned
//! proportionally across the video's frame range, with a playhead
//! marker above. Built from plain containers; widths use fill portions
//! scaled to a fixed resolution.

use iced::widget::{column, container, row, text, Space};
use iced::{Background, Border, Element, Length, Theme};

use crate::app::Message;
use crate::theme::{colors, font, spacing};

/// Portion resolution the frame range is scaled to.
const SCALE: u32 = 1000;

/// Build the timeline view for the flagged periods of the current
/// video.
pub fn view<'a>(
    periods: &'a [(u32, u32, String)],
    frame_count: u32,
    playhead: u32,
) -> Element<'a, Message> {
    if frame_count == 0 {
        return container(
            text("Timeline")
                .size(font::SM)
                .color(colors::TEXT_MUTED),
        )
        .padding(spacing::SM)
        .width(Length::Fill)
        .into();
    }

    let mut rows: Vec<Element<'a, Message>> = Vec::new();
    rows.push(playhead_row(playhead, frame_count));

    if periods.is_empty() {
        rows.push(
            text("No hazards flagged on this video yet")
                .size(font::SM)
                .color(colors::TEXT_MUTED)
                .into(),
        );
    } else {
        for (start, end, label) in periods {
            rows.push(period_row(*start, *end, label, frame_count));
        }
    }

    container(column(rows).spacing(spacing::XS).width(Length::Fill))
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            border: Border {
                color: colors::BORDER,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        })
        .into()
}

/// A thin track with a marker at the playhead position.
fn playhead_row<'a>(playhead: u32, frame_count: u32) -> Element<'a, Message> {
    let before = scaled(playhead.min(frame_count), frame_count);
    let after = SCALE.saturating_sub(before);

    let mut track = row![].height(Length::Fixed(10.0));
    if before > 0 {
        track = track.push(Space::new().width(Length::FillPortion(portion(before))));
    }
    track = track.push(
        container(Space::new().width(Length::Fixed(2.0)).height(Length::Fill)).style(
            |_theme: &Theme| container::Style {
                background: Some(Background::Color(colors::PLAYHEAD)),
                ..Default::default()
            },
        ),
    );
    if after > 0 {
        track = track.push(Space::new().width(Length::FillPortion(portion(after))));
    }

    track.width(Length::Fill).into()
}

/// One labelled hazard interval as a positioned bar.
fn period_row<'a>(
    start: u32,
    end: u32,
    label: &'a str,
    frame_count: u32,
) -> Element<'a, Message> {
    let start = start.min(frame_count);
    let end = end.clamp(start, frame_count);

    let before = scaled(start, frame_count);
    let len = scaled(end - start, frame_count).max(1);
    let after = SCALE.saturating_sub(before + len);

    let bar = container(text(label).size(font::SM))
        .padding([1, 4])
        .width(Length::FillPortion(portion(len)))
        .style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(colors::HAZARD)),
            border: Border {
                radius: 2.0.into(),
                ..Default::default()
            },
            ..Default::default()
        });

    let mut bar_row = row![];
    if before > 0 {
        bar_row = bar_row.push(Space::new().width(Length::FillPortion(portion(before))));
    }
    bar_row = bar_row.push(bar);
    if after > 0 {
        bar_row = bar_row.push(Space::new().width(Length::FillPortion(portion(after))));
    }

    bar_row.width(Length::Fill).into()
}

/// Scale a frame count onto the portion resolution.
fn scaled(frames: u32, frame_count: u32) -> u32 {
    (frames as u64 * SCALE as u64 / frame_count.max(1) as u64) as u32
}

fn portion(value: u32) -> u16 {
    value.clamp(1, SCALE) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_covers_the_range() {
        assert_eq!(scaled(0, 9000), 0);
        assert_eq!(scaled(9000, 9000), SCALE);
        assert_eq!(scaled(4500, 9000), SCALE / 2);
    }

    #[test]
    fn scaling_handles_zero_frame_count() {
        assert_eq!(scaled(10, 0), 10 * SCALE);
    }
}
