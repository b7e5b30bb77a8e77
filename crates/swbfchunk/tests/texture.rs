use pretty_assertions::assert_eq;
use swbfchunk::{
    ChunkBuilder, ChunkError, ChunkId, ChunkKind, Container, ContainerKind, D3DFormat,
    ImageFormat, TextureBody,
};

fn load(bytes: Vec<u8>) -> Container {
    let mut c = Container::create(ContainerKind::Level);
    c.read_from_bytes(bytes).expect("fixture parses");
    c
}

fn bodies(c: &Container) -> Vec<ChunkId> {
    c.iter()
        .filter(|(_, ch)| ch.header_name() == "BODY")
        .map(|(id, _)| id)
        .collect()
}

fn sky_texture() -> Container {
    // mip 0: 2x2 A8R8G8B8, mip 1: 1x1
    let mip0 = [0x10u8, 0x20, 0x30, 0x40].repeat(4);
    let mip1 = vec![0xff, 0x00, 0x00, 0xff];
    load(
        ChunkBuilder::ucfb()
            .with_child(ChunkBuilder::texture(
                "sky",
                D3DFormat::A8R8G8B8,
                2,
                2,
                vec![mip0, mip1],
            ))
            .to_bytes(),
    )
}

#[test]
fn texture_bodies_resolve_format_and_mip_dimensions() {
    let c = sky_texture();
    let ids = bodies(&c);
    assert_eq!(ids.len(), 2);

    match c.chunk(ids[0]).unwrap().kind() {
        ChunkKind::TextureBody(body) => assert_eq!(
            body,
            &TextureBody {
                format: D3DFormat::A8R8G8B8,
                width: 2,
                height: 2,
                mip_level: 0,
            }
        ),
        other => panic!("expected texture body, got {:?}", other),
    }

    let level1 = c.image_source(ids[1]).expect("image capability");
    assert_eq!((level1.width(), level1.height(), level1.mip_level()), (1, 1, 1));
}

#[test]
fn image_data_honours_requested_channel_order() {
    let c = sky_texture();
    let src = c.image_source(bodies(&c)[0]).unwrap();

    let rgba = src.image_data(ImageFormat::R8G8B8A8).unwrap();
    assert_eq!((rgba.width, rgba.height), (2, 2));
    assert_eq!(rgba.pixels.len(), 2 * 2 * 4);
    assert_eq!(&rgba.pixels[..4], &[0x30, 0x20, 0x10, 0x40]);

    let bgra = src.image_data(ImageFormat::B8G8R8A8).unwrap();
    assert_eq!(&bgra.pixels[..4], &[0x10, 0x20, 0x30, 0x40]);
}

#[test]
fn only_texture_bodies_have_image_capability() {
    let c = sky_texture();
    let with_image: Vec<String> = c
        .iter()
        .filter(|(id, _)| c.image_source(*id).is_some())
        .map(|(_, ch)| ch.header_name())
        .collect();
    assert_eq!(with_image, vec!["BODY", "BODY"]);
}

#[test]
fn texture_chunks_render_decoded_fields() {
    let c = sky_texture();

    // ucfb / tex_ / FMT_ / INFO
    let fmt_info = c.find_path(&[0, 2, 0]).unwrap();
    let text = c.to_text(fmt_info).unwrap();
    assert!(text.contains("Format:      A8R8G8B8"), "{}", text);
    assert!(text.contains("Width:       2"));
    assert!(text.contains("Mip count:   2"));

    // ucfb / tex_ / FMT_ / FACE / LVL_ / BODY
    let body = c.find_path(&[0, 2, 1, 0, 1]).unwrap();
    let text = c.to_text(body).unwrap();
    assert!(text.contains("Mip level: 0"));

    let name = c.find_path(&[0, 0]).unwrap();
    assert!(c.to_text(name).unwrap().contains("Value: \"sky\""));
}

#[test]
fn short_format_info_fails_to_render_and_leaves_body_plain() {
    let level = ChunkBuilder::new(b"LVL_")
        .with_child(ChunkBuilder::new(b"INFO").with_data(vec![0u8; 8]))
        .with_child(ChunkBuilder::new(b"BODY").with_data(vec![0u8; 16]));
    let bytes = ChunkBuilder::ucfb()
        .with_child(
            ChunkBuilder::new(b"tex_").with_child(
                ChunkBuilder::new(b"FMT_")
                    .with_child(ChunkBuilder::new(b"INFO").with_data(vec![21, 0, 0, 0, 2, 0]))
                    .with_child(ChunkBuilder::new(b"FACE").with_child(level)),
            ),
        )
        .to_bytes();
    let c = load(bytes);

    let info = c.find_path(&[0, 0, 0]).unwrap();
    match c.to_text(info) {
        Err(ChunkError::Decode { tag, .. }) => assert_eq!(tag, "INFO"),
        other => panic!("expected decode error, got {:?}", other),
    }

    let body = bodies(&c)[0];
    assert!(c.image_source(body).is_none());
    assert!(c.to_text(body).is_ok());
}

#[test]
fn truncated_body_reports_texture_error() {
    let c = load(
        ChunkBuilder::ucfb()
            .with_child(ChunkBuilder::texture(
                "short",
                D3DFormat::Dxt5,
                8,
                8,
                vec![vec![0u8; 20]],
            ))
            .to_bytes(),
    );
    let src = c.image_source(bodies(&c)[0]).unwrap();
    let err = src.image_data(ImageFormat::R8G8B8A8).unwrap_err();
    assert_eq!(
        err.to_string(),
        "texture body too short for Dxt5: need 64 bytes, have 20"
    );
}
