use image::{ImageBuffer, Rgba};
use stroke_text::{
    Argb, CpuCanvas, DrawOutcome, FontSystem, LayoutEstimator, StrokeTextConfig,
    StrokeTextRenderer,
    measure::Constraint,
    props::PropValue,
};

const PROPS: &[(&str, &str)] = &[
    ("color", "#ffd500"),
    ("strokeColor", "rgba(20, 20, 60, 1)"),
    ("align", "center"),
    ("fontFamily", "sans-serif"),
];

#[allow(clippy::unwrap_used)]
fn main() {
    let fonts = FontSystem::with_system_fonts();
    if fonts.is_empty() {
        println!("No system fonts found; the renderer will report its fallback size.");
    }
    let config = StrokeTextConfig::default().with_density(2.0);

    let text = "Stroke text rendering example.\n\
                The outline is painted first and the fill on top of it, \
                so long lines wrap and the third line is ellipsized.";

    let mut estimator = LayoutEstimator::new(fonts.clone(), config.clone());
    let mut renderer = StrokeTextRenderer::new(fonts, config);

    let mut apply = |name: &str, value: PropValue| {
        estimator.apply_raw(name, value.clone());
        renderer.apply_raw(name, value);
    };
    apply("text", text.into());
    apply("fontSize", PropValue::Float(24.0));
    apply("strokeWidth", PropValue::Float(3.0));
    apply("numberOfLines", PropValue::Int(3));
    apply("ellipsis", true.into());
    apply("width", PropValue::Float(320.0));
    for &(name, value) in PROPS {
        apply(name, value.into());
    }

    let width = Constraint::at_most(720.0);
    let height = Constraint::unspecified();
    let estimated = estimator.estimate(width, height);
    let measured = renderer.measure(width, height);
    println!(
        "Estimated {}x{}, measured {}x{}",
        estimated.width, estimated.height, measured.width, measured.height
    );

    let mut canvas = CpuCanvas::new(measured.width as usize, measured.height as usize);
    canvas.clear(Argb::from_argb(255, 90, 150, 220));

    let timer = std::time::Instant::now();
    let outcome = renderer.draw(&mut canvas, measured);
    let elapsed = timer.elapsed();
    match outcome {
        DrawOutcome::Drawn { origin } => {
            println!("Drew at ({}, {}) in {elapsed:.2?}", origin.x, origin.y)
        }
        other => {
            println!("Nothing drawn: {other:?}");
            return;
        }
    }
    if let Some(laid) = renderer.layouts() {
        println!("Drawn run: {:?}", laid.run);
    }

    std::fs::create_dir_all("debug").expect("failed to create debug directory");

    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(
        canvas.width() as u32,
        canvas.height() as u32,
        canvas.to_rgba8(),
    )
    .expect("canvas dimensions must match pixel buffer length");

    img_buffer
        .save("debug/stroke_text.png")
        .expect("failed to save debug image");

    println!("Saved debug image to debug/stroke_text.png");
}
