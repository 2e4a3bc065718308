use mask_editor::mask::{MaskEditor, PixelBuffer, Rgba};
use mask_editor::settings::EditorSettings;

/// Editor over a uniformly colored reference image with a blank (black) mask.
pub fn editor(width: u32, height: u32) -> MaskEditor {
    editor_with(width, height, EditorSettings::default())
}

pub fn editor_with(width: u32, height: u32, settings: EditorSettings) -> MaskEditor {
    let mut editor = MaskEditor::new(settings).expect("editor");
    editor.load_image(PixelBuffer::new(width, height, Rgba::rgba(90, 120, 60, 255)));
    editor.load_mask(None).expect("blank mask");
    editor
}

pub fn count_color(buffer: &PixelBuffer, color: Rgba) -> usize {
    buffer
        .pixels()
        .chunks_exact(4)
        .filter(|px| Rgba::from_slice(px) == color)
        .count()
}
