// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Timestamp label rendering.
//!
//! Produces the small banner stamped onto the top-left corner of every
//! composite, showing the frame time as `YYYY-MM-DD HH:mm`.

use ab_glyph::{FontRef, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use lazy_static::lazy_static;

use crate::error::Result;
use crate::mesh::MeshIndex;

pub const LABEL_WIDTH: u32 = 300;
pub const LABEL_HEIGHT: u32 = 55;
pub const LABEL_BACKGROUND: Rgba<u8> = Rgba([0x33, 0x55, 0xff, 0xff]);
pub const LABEL_TEXT_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

const TEXT_OFFSET: (i32, i32) = (10, 10);
const FONT_SIZE: f32 = 32.0;
const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

lazy_static! {
    static ref FONT: FontRef<'static> =
        FontRef::try_from_slice(FONT_DATA).expect("bundled DejaVu Sans is a valid font");
}

/// Human-readable frame time, e.g. `2017-05-30 13:05`.
#[must_use]
pub fn label_text(index: &MeshIndex) -> String {
    index.to_datetime().format(LABEL_FORMAT).to_string()
}

/// Render the timestamp banner for a frame.
#[must_use]
pub fn render_label(index: &MeshIndex) -> RgbaImage {
    let mut label = RgbaImage::from_pixel(LABEL_WIDTH, LABEL_HEIGHT, LABEL_BACKGROUND);
    draw_text_mut(
        &mut label,
        LABEL_TEXT_COLOR,
        TEXT_OFFSET.0,
        TEXT_OFFSET.1,
        PxScale::from(FONT_SIZE),
        &*FONT,
        &label_text(index),
    );
    label
}

/// Parse a raw token and render its banner.
pub fn render_label_for(token: &str) -> Result<RgbaImage> {
    let index = MeshIndex::parse(token)?;
    Ok(render_label(&index))
}
