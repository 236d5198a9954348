use card_gen::{render_front, CardAssets, FrontOptions};

fn main() {
    let font_path = std::env::args()
        .nth(1)
        .expect("usage: front-face <font.ttf>");
    let font = std::fs::read(font_path).expect("can read font");

    let assets = CardAssets::with_single_font(font);

    let face = render_front(
        &assets,
        FrontOptions {
            name: "韩梅梅".to_string(),
            id_no: "11010519491231002X".to_string(),
            nationality: None,
            address: Some("北京市朝阳区建国路93号1202室".to_string()),
        },
    )
    .expect("can render the front face");

    face.canvas.save("front.png").expect("can save front face");
    println!("rendered {} ({})", face.name, face.id_no);
}
