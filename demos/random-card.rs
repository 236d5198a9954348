use card_gen::mock::Rng;
use card_gen::{render_random, CardAssets};

fn main() {
    // any TTF/OTF face covering CJK will do
    let font_path = std::env::args()
        .nth(1)
        .expect("usage: random-card <font.ttf>");
    let font = std::fs::read(font_path).expect("can read font");

    let assets = CardAssets::with_single_font(font);
    let mut rng = Rng::from_entropy();

    let card = render_random(&assets, &mut rng).expect("can render card");
    card.front.canvas.save("front.png").expect("can save front face");
    card.back.canvas.save("back.png").expect("can save back face");

    println!(
        "{} {} valid {} - {}",
        card.front.name, card.front.id_no, card.back.start_date, card.back.end_date
    );
}
