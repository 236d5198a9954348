use crate::area;
use crate::canvas::{Canvas, CARD_HEIGHT, CARD_WIDTH};
use crate::colour::{colours, Colour};
use crate::font::Font;
use crate::idno::{IdNumber, Sex};
use crate::mock::{self, Rng};
use crate::units::Px;
use crate::validity::{format_card_date, ValidityPeriod};
use crate::CardError;
use chrono::{Datelike, Local, NaiveDate};
use image::DynamicImage;
use log::debug;

/// The fonts and images the card faces are assembled from. Only the fonts are
/// required: faces render with flat paint and a portrait placeholder when no
/// textures are supplied
pub struct CardAssets {
    /// Face for the printed field labels, traditionally a heiti face
    pub label_font: Vec<u8>,
    /// Face for the holder's particulars
    pub value_font: Vec<u8>,
    /// Face for the citizen number line
    pub number_font: Vec<u8>,
    pub front_background: Option<DynamicImage>,
    pub back_background: Option<DynamicImage>,
    pub male_avatar: Option<DynamicImage>,
    pub female_avatar: Option<DynamicImage>,
}

impl CardAssets {
    /// Use one typeface for labels, values, and the number line alike
    pub fn with_single_font(font: Vec<u8>) -> CardAssets {
        CardAssets {
            label_font: font.clone(),
            value_font: font.clone(),
            number_font: font,
            front_background: None,
            back_background: None,
            male_avatar: None,
            female_avatar: None,
        }
    }
}

/// Options for the portrait face
pub struct FrontOptions {
    /// The holder's name. Required
    pub name: String,
    /// The holder's ID number. Required, validated before any drawing
    pub id_no: String,
    /// Ethnic group, defaulting to 汉
    pub nationality: Option<String>,
    /// Residential address. Derived from the registration area when unset
    pub address: Option<String>,
}

/// A rendered portrait face plus the particulars that went onto it
pub struct FrontFace {
    pub canvas: Canvas,
    pub data_url: String,
    pub id_no: String,
    pub name: String,
    pub address: String,
}

/// Options for the emblem face
#[derive(Default)]
pub struct BackOptions {
    /// The holder's ID number, used to derive the validity window and the
    /// issuing authority when those are unset
    pub id_no: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// The issuing authority line, overriding the area-derived one
    pub authority: Option<String>,
}

/// A rendered emblem face plus the validity window printed on it
pub struct BackFace {
    pub canvas: Canvas,
    pub data_url: String,
    pub start_date: String,
    pub end_date: String,
}

/// Both faces of one card
pub struct IdCard {
    pub front: FrontFace,
    pub back: BackFace,
}

// layout plan of the portrait face, in pixels
const START_X: f32 = 45.0;
const START_Y: f32 = 65.0;
const ROW_GAP: f32 = 55.0;
// the value column sits three and a half label glyphs in
const VALUE_GAP: f32 = 3.5 * 18.0;

/// Position and size of the portrait on the front face
fn portrait_box() -> (i64, i64, u32, u32) {
    let width = (CARD_WIDTH as f32 * 0.3).round() as u32;
    let height = (CARD_HEIGHT as f32 * 0.58).round() as u32;
    let left = CARD_WIDTH as i64 - width as i64 - 50;
    let top = CARD_HEIGHT as i64 - height as i64 - 110;
    (left, top, width, height)
}

/// Render the portrait face of a card. The ID number is validated first; the
/// birth row and the portrait choice come from it
pub fn render_front(assets: &CardAssets, options: FrontOptions) -> Result<FrontFace, CardError> {
    if options.name.trim().is_empty() {
        return Err(CardError::InvalidInput("a holder name is required".into()));
    }
    let id = IdNumber::parse(&options.id_no)?;

    let mut canvas = Canvas::new_card();
    match &assets.front_background {
        Some(background) => canvas.draw_image(background, 0, 0, CARD_WIDTH, CARD_HEIGHT),
        None => canvas.fill(colours::CARD_PAPER),
    }

    let (left, top, width, height) = portrait_box();
    let portrait = match id.sex() {
        Sex::Female => &assets.female_avatar,
        Sex::Male => &assets.male_avatar,
    };
    match portrait {
        Some(image) => canvas.draw_image(image, left, top, width, height),
        None => canvas.fill_rect(left, top, width, height, Colour::new_rgb_bytes(0xc9, 0xd4, 0xdb)),
    }

    let label_font = canvas.add_font(Font::load(assets.label_font.clone())?);
    let value_font = canvas.add_font(Font::load(assets.value_font.clone())?);
    let number_font = canvas.add_font(Font::load(assets.number_font.clone())?);

    // the text column stops short of the portrait
    let text_max_width = Px((left - 130) as f32);

    // field labels in blue ink
    canvas.set_font(label_font, Px(18.0));
    canvas.set_fill(colours::LABEL_BLUE);
    canvas.loose_text("姓名", Px(START_X), Px(START_Y), Px(8.0))?;
    canvas.loose_text("性别", Px(START_X), Px(START_Y + ROW_GAP), Px(8.0))?;
    canvas.loose_text("民族", Px(START_X + 130.0), Px(START_Y + ROW_GAP), Px(8.0))?;
    canvas.loose_text("出生", Px(START_X), Px(START_Y + ROW_GAP * 2.0), Px(8.0))?;
    canvas.fill_text("年", Px(START_X + 130.0), Px(START_Y + ROW_GAP * 2.0))?;
    canvas.fill_text("月", Px(START_X + 200.0), Px(START_Y + ROW_GAP * 2.0))?;
    canvas.fill_text("日", Px(START_X + 270.0), Px(START_Y + ROW_GAP * 2.0))?;
    canvas.loose_text("住址", Px(START_X), Px(START_Y + ROW_GAP * 3.0), Px(8.0))?;
    canvas.set_font(label_font, Px(20.0));
    canvas.loose_text(
        "公民身份号码",
        Px(START_X - 8.0),
        Px(START_Y + ROW_GAP * 5.0 + 10.0),
        Px(2.0),
    )?;

    // the holder's particulars in black
    let birth = id.birth_date();
    canvas.set_font(value_font, Px(20.0));
    canvas.set_fill(colours::BLACK);
    canvas.loose_text(&options.name, Px(START_X + VALUE_GAP), Px(START_Y), Px(1.0))?;
    canvas.fill_text(
        id.sex().description(),
        Px(START_X + VALUE_GAP),
        Px(START_Y + ROW_GAP),
    )?;
    let nationality = options.nationality.as_deref().unwrap_or("汉");
    canvas.fill_text(
        nationality,
        Px(START_X + 130.0 + VALUE_GAP),
        Px(START_Y + ROW_GAP),
    )?;
    canvas.fill_text(
        &birth.year().to_string(),
        Px(START_X + VALUE_GAP),
        Px(START_Y + ROW_GAP * 2.0),
    )?;
    canvas.fill_text(
        &birth.month().to_string(),
        Px(START_X + 170.0),
        Px(START_Y + ROW_GAP * 2.0),
    )?;
    canvas.fill_text(
        &birth.day().to_string(),
        Px(START_X + 230.0),
        Px(START_Y + ROW_GAP * 2.0),
    )?;

    let address = match options.address {
        Some(address) if !address.trim().is_empty() => address,
        _ => mock::address_for(&mut Rng::from_entropy(), &id),
    };
    canvas.flexible_text(
        &address,
        Px(START_X + VALUE_GAP),
        Px(START_Y + ROW_GAP * 3.0),
        Some(text_max_width),
        Some(Px(28.0)),
        Some(Px(2.0)),
    )?;

    canvas.set_font(number_font, Px(26.0));
    canvas.loose_text(
        id.as_str(),
        Px(START_X + 4.5 * 18.0 + VALUE_GAP),
        Px(START_Y + ROW_GAP * 5.0 + 10.0),
        Px(2.5),
    )?;

    debug!(
        "front face rendered for region {} ({} chars of address)",
        id.region_code(),
        address.chars().count()
    );

    let data_url = canvas.to_data_url()?;
    Ok(FrontFace {
        canvas,
        data_url,
        id_no: id.as_str().to_string(),
        name: options.name,
        address,
    })
}

/// Render the emblem face of a card: the issuing authority and the validity
/// window, both derivable from the ID number when not given explicitly
pub fn render_back(assets: &CardAssets, options: BackOptions) -> Result<BackFace, CardError> {
    let id = options.id_no.as_deref().map(IdNumber::parse).transpose()?;

    let mut canvas = Canvas::new_card();
    match &assets.back_background {
        Some(background) => canvas.draw_image(background, 0, 0, CARD_WIDTH, CARD_HEIGHT),
        None => canvas.fill(colours::CARD_PAPER),
    }

    let today = Local::now().date_naive();
    let period = ValidityPeriod::derive(options.start_date, options.end_date, id.as_ref(), today);
    let start_date = format_card_date(period.start);
    let end_date = period.expiry.to_string();

    let authority = options
        .authority
        .or_else(|| {
            id.as_ref()
                .and_then(area::address_info_for)
                .map(|info| info.police)
        })
        .unwrap_or_else(|| "上海市".to_string());

    let label_font = canvas.add_font(Font::load(assets.label_font.clone())?);
    let value_font = canvas.add_font(Font::load(assets.value_font.clone())?);

    canvas.set_font(label_font, Px(20.0));
    canvas.set_fill(colours::BLACK);
    canvas.fill_text("签发机关", Px(140.0), Px(310.0))?;
    canvas.fill_text("有效期限", Px(140.0), Px(360.0))?;

    canvas.set_font(value_font, Px(22.0));
    canvas.fill_text(&authority, Px(260.0), Px(310.0))?;
    canvas.fill_text(&format!("{start_date} - {end_date}"), Px(260.0), Px(360.0))?;

    debug!("back face rendered, valid {start_date} - {end_date}");

    let data_url = canvas.to_data_url()?;
    Ok(BackFace {
        canvas,
        data_url,
        start_date,
        end_date,
    })
}

/// Render both faces of a card with random particulars: a generated ID
/// number, a name matching its sex, and an address below its registration
/// area
pub fn render_random(assets: &CardAssets, rng: &mut Rng) -> Result<IdCard, CardError> {
    let today = Local::now().date_naive();
    let id = mock::id_number(rng, today);
    let name = mock::full_name(rng, Some(id.sex()));
    let address = mock::address_for(rng, &id);

    let front = render_front(
        assets,
        FrontOptions {
            name,
            id_no: id.as_str().to_string(),
            nationality: None,
            address: Some(address),
        },
    )?;
    let back = render_back(
        assets,
        BackOptions {
            id_no: Some(id.as_str().to_string()),
            ..BackOptions::default()
        },
    )?;

    Ok(IdCard { front, back })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_assets() -> CardAssets {
        CardAssets::with_single_font(Vec::new())
    }

    #[test]
    fn portrait_box_matches_the_card_plan() {
        assert_eq!(portrait_box(), (398, 60, 192, 234));
    }

    #[test]
    fn front_requires_a_name() {
        let options = FrontOptions {
            name: "  ".into(),
            id_no: "11010519491231002X".into(),
            nationality: None,
            address: None,
        };
        assert!(matches!(
            render_front(&empty_assets(), options),
            Err(CardError::InvalidInput(_))
        ));
    }

    #[test]
    fn front_rejects_an_invalid_id_number_before_drawing() {
        let options = FrontOptions {
            name: "王伟".into(),
            id_no: "110105194912310021".into(),
            nationality: None,
            address: None,
        };
        assert!(matches!(
            render_front(&empty_assets(), options),
            Err(CardError::InvalidIdNumber(_))
        ));
    }

    #[test]
    fn back_rejects_an_invalid_id_number() {
        let options = BackOptions {
            id_no: Some("not-a-number".into()),
            ..BackOptions::default()
        };
        assert!(matches!(
            render_back(&empty_assets(), options),
            Err(CardError::InvalidIdNumber(_))
        ));
    }
}
