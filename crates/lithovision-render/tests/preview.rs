use std::sync::Arc;

use lithovision_image::{Image, ImageSize};
use lithovision_render::{
    catalog::SlabCatalog,
    config::RenderSettings,
    context::{EditMode, ProjectContext},
    export,
    loader::{FileTextureSource, TextureEvent, TextureLoader},
    pipeline, RenderError,
};

const CATALOG_JSON: &str = r#"[
    {
        "sku": "NERO-204",
        "name": "Nero Marquina",
        "finish": "Honed",
        "texture_ref": "nero-marquina.jpg",
        "quarry": "Markina, Spain",
        "color": "black"
    }
]"#;

fn jpeg_bytes(width: usize, height: usize, value: u8) -> Vec<u8> {
    let image =
        Image::<u8, 3>::from_size_val(ImageSize { width, height }, value).expect("valid size");
    lithovision_io::jpeg::encode_image_jpeg_rgb8(&image, 95).expect("encodable")
}

#[tokio::test]
async fn upload_select_paint_render_export() -> Result<(), RenderError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = RenderSettings::default();
    let tmp_dir = tempfile::tempdir().map_err(|e| RenderError::Config(e.to_string()))?;

    // a bright slab texture on disk, resolvable through the catalog
    std::fs::write(
        tmp_dir.path().join("nero-marquina.jpg"),
        jpeg_bytes(32, 32, 220),
    )
    .map_err(|e| RenderError::Config(e.to_string()))?;

    let catalog = SlabCatalog::from_json(CATALOG_JSON)?;
    let slab = catalog.get("NERO-204").expect("slab in catalog").clone();

    // upload a dark photo larger than the working bounds
    let mut ctx = ProjectContext::new();
    pipeline::load_photo_bytes(&mut ctx, &jpeg_bytes(2400, 1350, 40), &settings)?;

    let photo_size = ctx.photo().expect("photo loaded").size();
    assert_eq!(
        photo_size,
        ImageSize {
            width: 1920,
            height: 1080
        }
    );

    // select the slab and fetch its texture
    let texture_ref = slab.texture_ref.clone();
    ctx.select_slab(slab);

    let mut loader = TextureLoader::new(Arc::new(FileTextureSource::new(tmp_dir.path())));
    loader.request(&texture_ref);
    assert_eq!(loader.next_event().await, TextureEvent::Loaded);

    // paint a selection in the middle of the photo
    ctx.set_mode(EditMode::MaskBrush);
    ctx.set_brush_size(60.0);
    assert!(ctx.stroke([700.0, 500.0], [1200.0, 500.0])?);

    let frame = pipeline::render(&ctx, &loader, &settings)?;
    assert_eq!(frame.size(), photo_size);

    // the painted region carries the bright slab, the rest stays dark
    let painted = *frame.get([500, 900, 0]).expect("in bounds");
    let untouched = *frame.get([50, 50, 0]).expect("in bounds");
    assert!(painted > 150, "painted pixel too dark: {painted}");
    assert!(untouched < 60, "untouched pixel changed: {untouched}");

    // before view reproduces the photo
    ctx.set_show_before(true);
    let before = pipeline::render(&ctx, &loader, &settings)?;
    assert_eq!(
        before.as_slice(),
        ctx.photo().expect("photo loaded").as_slice()
    );
    ctx.set_show_before(false);

    // export bytes are a JPEG and the filename carries the sku
    let bytes = export::export_frame(&frame, &settings)?;
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(
        export::export_filename(&settings, ctx.selected_slab()),
        "lithovision-NERO-204.jpg"
    );

    Ok(())
}

#[tokio::test]
async fn missing_texture_is_a_visible_error() -> Result<(), RenderError> {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = RenderSettings::default();
    let tmp_dir = tempfile::tempdir().map_err(|e| RenderError::Config(e.to_string()))?;

    let catalog = SlabCatalog::from_json(CATALOG_JSON)?;
    let slab = catalog.get("NERO-204").expect("slab in catalog").clone();

    let mut ctx = ProjectContext::new();
    pipeline::load_photo_bytes(&mut ctx, &jpeg_bytes(640, 480, 90), &settings)?;
    ctx.select_slab(slab);
    ctx.clear_mask()?;

    // the referenced file does not exist under the source root
    let mut loader = TextureLoader::new(Arc::new(FileTextureSource::new(tmp_dir.path())));
    loader.request("nero-marquina.jpg");
    assert!(matches!(loader.next_event().await, TextureEvent::Failed(_)));

    let result = pipeline::render(&ctx, &loader, &settings);
    assert!(matches!(result, Err(RenderError::TextureUnavailable(_))));
    Ok(())
}
