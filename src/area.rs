//! Administrative-division lookups backing addresses and issuing authorities.
//!
//! The tables cover a representative slice of the GB/T 2260 division codes,
//! keyed by the 2-digit province, 4-digit city, and 6-digit county prefixes
//! of a citizen ID number. Municipalities repeat the province name at the
//! city tier, which is why joined addresses go through duplicate-segment
//! removal.

use crate::idno::IdNumber;

/// The three name tiers a division code resolves to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AreaNames {
    pub province: &'static str,
    pub city: &'static str,
    pub county: &'static str,
}

/// Everything the card faces derive from a division code: the tier names,
/// the joined address prefix, and the issuing authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressInfo {
    pub names: AreaNames,
    /// The tier names joined with duplicated segments removed
    pub address: String,
    /// The police authority printed on the emblem face
    pub police: String,
}

static PROVINCES: &[(u32, &str)] = &[
    (11, "北京市"),
    (15, "内蒙古自治区"),
    (31, "上海市"),
    (32, "江苏省"),
    (33, "浙江省"),
    (44, "广东省"),
    (51, "四川省"),
    (62, "甘肃省"),
];

static CITIES: &[(u32, &str)] = &[
    (1101, "北京市"),
    (1507, "呼伦贝尔市"),
    (3101, "上海市"),
    (3201, "南京市"),
    (3205, "苏州市"),
    (3301, "杭州市"),
    (3302, "宁波市"),
    (4401, "广州市"),
    (4403, "深圳市"),
    (5101, "成都市"),
    (5134, "凉山彝族自治州"),
    (6201, "兰州市"),
    (6230, "甘南藏族自治州"),
];

pub(crate) static COUNTIES: &[(u32, &str)] = &[
    (110101, "东城区"),
    (110105, "朝阳区"),
    (110108, "海淀区"),
    (150722, "莫力达瓦达斡尔族自治旗"),
    (310101, "黄浦区"),
    (310104, "徐汇区"),
    (310110, "杨浦区"),
    (310115, "浦东新区"),
    (320102, "玄武区"),
    (320106, "鼓楼区"),
    (320505, "虎丘区"),
    (320507, "相城区"),
    (330102, "上城区"),
    (330106, "西湖区"),
    (330203, "海曙区"),
    (440103, "荔湾区"),
    (440106, "天河区"),
    (440304, "福田区"),
    (440305, "南山区"),
    (510104, "锦江区"),
    (510107, "武侯区"),
    (513422, "木里藏族自治县"),
    (620102, "城关区"),
    (623027, "夏河县"),
];

fn find(table: &'static [(u32, &'static str)], code: u32) -> Option<&'static str> {
    table
        .iter()
        .find(|(prefix, _)| *prefix == code)
        .map(|(_, name)| *name)
}

/// Resolve a six-digit division code to its name tiers. All three tiers must
/// be present in the tables
pub fn lookup(code: u32) -> Option<AreaNames> {
    let province = find(PROVINCES, code / 10_000)?;
    let city = find(CITIES, code / 100)?;
    let county = find(COUNTIES, code)?;
    Some(AreaNames {
        province,
        city,
        county,
    })
}

/// Join name segments, dropping a segment the result already ends with, so
/// municipality addresses don't repeat the province name
fn join_deduped(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts {
        if !part.is_empty() && !joined.ends_with(part) {
            joined.push_str(part);
        }
    }
    joined
}

/// Everything address-related a division code yields. County seats with 县 in
/// the name, and counties with long names, issue under the county authority
/// alone; city districts issue under the city plus the district
pub fn address_info(code: u32) -> Option<AddressInfo> {
    let names = lookup(code)?;
    let address = join_deduped(&[names.province, names.city, names.county]);

    let is_county_seat = names.county.contains('县');
    let police = if is_county_seat || names.county.chars().count() >= 6 {
        format!("{}公安局", names.county)
    } else {
        format!("{}{}公安局", names.city, names.county)
    };

    Some(AddressInfo {
        names,
        address,
        police,
    })
}

/// [address_info] keyed by a validated ID number's region code
pub fn address_info_for(id: &IdNumber) -> Option<AddressInfo> {
    address_info(id.region_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_all_three_tiers() {
        let names = lookup(310115).unwrap();
        assert_eq!(names.province, "上海市");
        assert_eq!(names.city, "上海市");
        assert_eq!(names.county, "浦东新区");
    }

    #[test]
    fn unknown_codes_resolve_to_nothing() {
        assert_eq!(lookup(990101), None);
        assert_eq!(lookup(310199), None);
    }

    #[test]
    fn municipality_addresses_drop_the_repeated_name() {
        let info = address_info(310115).unwrap();
        assert_eq!(info.address, "上海市浦东新区");

        let info = address_info(330106).unwrap();
        assert_eq!(info.address, "浙江省杭州市西湖区");
    }

    #[test]
    fn districts_issue_under_city_and_district() {
        let info = address_info(330106).unwrap();
        assert_eq!(info.police, "杭州市西湖区公安局");
    }

    #[test]
    fn county_seats_issue_under_the_county_alone() {
        let info = address_info(623027).unwrap();
        assert_eq!(info.police, "夏河县公安局");
    }

    #[test]
    fn long_county_names_issue_alone_even_without_xian() {
        let info = address_info(150722).unwrap();
        assert_eq!(info.police, "莫力达瓦达斡尔族自治旗公安局");
    }
}
