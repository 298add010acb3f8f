use egui::{Color32, Pos2, pos2};
use image::{Rgba, RgbaImage};
use raster_paint::raster::RasterContext;
use raster_paint::state::config::{GradientKind, PaintKind};
use raster_paint::state::ToolConfig;
use raster_paint::tools::{Stroke, brushes, shapes};

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn canvas() -> RgbaImage {
    RgbaImage::from_pixel(100, 100, BACKGROUND)
}

fn stroke(from: Pos2, to: Pos2, size: f32) -> Stroke {
    let mut config = ToolConfig::default();
    config.set_brush_size(size);
    Stroke::new(from, to, &config, 1.0)
}

fn render(image: &mut RgbaImage, renderer: fn(&mut RasterContext<'_>, &Stroke), stroke: &Stroke) {
    let mut ctx = RasterContext::new(image);
    renderer(&mut ctx, stroke);
}

fn touched(a: &RgbaImage, b: &RgbaImage) -> usize {
    a.pixels().zip(b.pixels()).filter(|(x, y)| x != y).count()
}

#[test]
fn test_pencil_width_follows_size_and_zoom() {
    let mut thin = canvas();
    render(&mut thin, brushes::pencil, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 4.0));
    let mut wide = canvas();
    render(&mut wide, brushes::pencil, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 12.0));
    assert!(touched(&canvas(), &wide) > touched(&canvas(), &thin) * 2);

    // Zooming in keeps the on-screen width, so the content width shrinks.
    let mut zoomed = canvas();
    let mut s = stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 12.0);
    s.zoom = 3.0;
    render(&mut zoomed, brushes::pencil, &s);
    assert_eq!(touched(&canvas(), &zoomed), touched(&canvas(), &thin));
}

#[test]
fn test_soft_pencil_feathers_edges() {
    let mut hard = canvas();
    render(&mut hard, brushes::pencil, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0));
    let mut soft = canvas();
    let mut s = stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0);
    s.hardness = 0.2;
    render(&mut soft, brushes::pencil, &s);

    let partial = |image: &RgbaImage| image.pixels().filter(|p| p[0] > 0 && p[0] < 255).count();
    assert!(partial(&soft) > partial(&hard));
    // Round caps reach past the end points.
    assert!(soft.get_pixel(7, 50)[0] > 0);
    assert_eq!(hard.get_pixel(7, 50), &BACKGROUND);
}

#[test]
fn test_ink_pencil_is_aliased() {
    let mut image = canvas();
    render(&mut image, brushes::ink_pencil, &stroke(pos2(10.0, 10.0), pos2(80.0, 63.0), 6.0));

    assert!(touched(&canvas(), &image) > 0);
    assert!(image.pixels().all(|p| p[0] == 0 || p[0] == 255));
}

#[test]
fn test_eraser_clears_alpha() {
    let mut image = RgbaImage::from_pixel(100, 100, Rgba([200, 100, 50, 255]));
    render(&mut image, brushes::eraser, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0));

    assert_eq!(image.get_pixel(50, 50)[3], 0);
    // Colour channels are left alone.
    assert_eq!(image.get_pixel(50, 50)[0], 200);
    assert_eq!(image.get_pixel(50, 10)[3], 255);
}

#[test]
fn test_fade_eraser_removes_a_fifth() {
    let mut image = RgbaImage::from_pixel(100, 100, Rgba([200, 100, 50, 255]));
    render(&mut image, brushes::fade_eraser, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0));
    assert_eq!(image.get_pixel(50, 50)[3], 204);

    render(&mut image, brushes::fade_eraser, &stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0));
    assert!(image.get_pixel(50, 50)[3] < 204);
}

#[test]
fn test_pixel_brush_fills_grid_cell() {
    let mut image = canvas();
    render(&mut image, brushes::pixel_brush, &stroke(pos2(15.0, 15.0), pos2(15.0, 15.0), 10.0));

    assert_eq!(touched(&canvas(), &image), 100);
    assert_eq!(image.get_pixel(10, 10)[0], 255);
    assert_eq!(image.get_pixel(19, 19)[0], 255);
    assert_eq!(image.get_pixel(9, 9), &BACKGROUND);
    assert_eq!(image.get_pixel(20, 20), &BACKGROUND);
}

#[test]
fn test_pixel_brush_cell_shrinks_with_zoom() {
    let mut image = canvas();
    let mut s = stroke(pos2(7.0, 7.0), pos2(7.0, 7.0), 10.0);
    s.zoom = 2.0;
    render(&mut image, brushes::pixel_brush, &s);

    assert_eq!(touched(&canvas(), &image), 25);
    assert_eq!(image.get_pixel(5, 5)[0], 255);
}

#[test]
fn test_fog_pencil_fades_outwards() {
    let mut image = canvas();
    let mut s = stroke(pos2(40.0, 40.0), pos2(50.0, 50.0), 10.0);
    s.opacity = 1.0;
    render(&mut image, brushes::fog_pencil, &s);

    let center = image.get_pixel(50, 50)[0];
    let edge = image.get_pixel(62, 50)[0];
    assert!(center > edge);
    assert!(center <= 26);
    // Diameter 30, so nothing past radius 15.
    assert_eq!(image.get_pixel(67, 50), &BACKGROUND);
    // The previous point is ignored.
    assert_eq!(image.get_pixel(30, 30), &BACKGROUND);
}

#[test]
fn test_water_brush_is_deterministic_per_seed() {
    let mut s = stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 20.0);
    s.paint = PaintKind::Water;

    let mut a = canvas();
    render(&mut a, brushes::paint_brush, &s.with_seed(7));
    let mut b = canvas();
    render(&mut b, brushes::paint_brush, &s.with_seed(7));
    assert_eq!(a, b);

    // Three passes at 30% each never reach full opacity.
    assert!(a.pixels().all(|p| p[0] < 255));
}

#[test]
fn test_oil_brush_is_wider_than_stark() {
    let mut s = stroke(pos2(10.0, 50.0), pos2(90.0, 50.0), 10.0);
    let mut stark = canvas();
    render(&mut stark, brushes::paint_brush, &s);

    s.paint = PaintKind::Oil;
    let mut oil = canvas();
    render(&mut oil, brushes::paint_brush, &s);

    assert!(touched(&canvas(), &oil) > touched(&canvas(), &stark));
    assert_eq!(stark.get_pixel(50, 50)[0], 255);
    assert!(oil.get_pixel(50, 50)[0] < 255);
}

#[test]
fn test_radial_gradient_starts_at_primary() {
    let mut image = canvas();
    {
        let mut ctx = RasterContext::new(&mut image);
        shapes::gradient(
            &mut ctx,
            pos2(50.0, 50.0),
            pos2(90.0, 50.0),
            GradientKind::Radial,
            (Color32::from_rgb(255, 0, 0), Color32::from_rgb(0, 0, 255)),
            1.0,
        );
    }
    assert_eq!(image.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
    assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
}

#[test]
fn test_vertical_gradient_reversed_by_upward_drag() {
    let mut image = canvas();
    {
        let mut ctx = RasterContext::new(&mut image);
        shapes::gradient(
            &mut ctx,
            pos2(50.0, 90.0),
            pos2(52.0, 10.0),
            GradientKind::Linear,
            (Color32::WHITE, Color32::BLACK),
            1.0,
        );
    }
    assert!(image.get_pixel(50, 99)[0] > 250);
    assert!(image.get_pixel(50, 0)[0] < 5);
}

#[test]
fn test_gradient_guide_is_dashed() {
    let mut image = canvas();
    {
        let mut ctx = RasterContext::new(&mut image);
        shapes::gradient_guide(&mut ctx, pos2(0.0, 50.0), pos2(100.0, 50.0), 1.0);
    }
    // Dashes and gaps of 5 px.
    assert!(image.get_pixel(2, 50)[0] > 0);
    assert_eq!(image.get_pixel(7, 50), &BACKGROUND);
    assert!(image.get_pixel(12, 50)[0] > 0);
}
