//! Random synthetic data for card generation: names, street addresses, and
//! checksum-valid ID numbers. Everything draws from one seedable generator so
//! tests can pin their output.

use crate::area::{self, COUNTIES};
use crate::idno::{IdNumber, Sex};
use chrono::{Datelike, NaiveDate};
use std::time::{SystemTime, UNIX_EPOCH};

/// A small xorshift64 generator, not cryptographically secure. Good enough
/// for mock particulars, and seedable for reproducible tests
pub struct Rng {
    state: u64,
}

impl Rng {
    /// A generator with a fixed seed. The same seed always produces the same
    /// sequence
    pub fn seeded(seed: u64) -> Rng {
        Rng {
            // xorshift state must never be zero
            state: seed.max(1),
        }
    }

    /// A generator seeded from the system clock
    pub fn from_entropy() -> Rng {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x1234_5678_9abc_def0);
        Rng::seeded(nanos)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// A value in `0..limit`
    pub fn below(&mut self, limit: u64) -> u64 {
        self.next() % limit.max(1)
    }

    /// A value in `min..=max`
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        min + self.below(max - min + 1)
    }

    fn pick<'a, T>(&mut self, list: &'a [T]) -> &'a T {
        &list[self.below(list.len() as u64) as usize]
    }
}

static SURNAMES: &[&str] = &[
    "王", "李", "张", "刘", "陈", "杨", "赵", "黄", "周", "吴", "徐", "孙", "胡", "朱", "高",
    "林", "何", "郭", "马", "罗", "梁", "宋", "郑", "谢", "韩", "唐", "冯", "于", "董", "萧",
    "程", "曹", "袁", "邓", "许", "傅", "沈", "曾", "彭", "吕", "诸葛", "欧阳", "上官", "司马",
];

static FEMALE_GIVEN: &[&str] = &[
    "丽", "娜", "美", "颖", "婷", "芳", "芬", "莉", "娟", "艳", "梅", "琳", "璐", "蕾", "茜",
    "诗涵", "欣怡", "雅静", "梓萱", "瑾萱", "雨彤", "梓涵", "欣妍", "婧琪", "语嫣", "若彤",
    "梦璐", "思颖", "雅琪", "芷若", "可馨", "雨婷", "雅雯", "若曦", "梦琪", "雨欣", "佳怡",
];

static MALE_GIVEN: &[&str] = &[
    "伟", "杰", "强", "磊", "勇", "飞", "刚", "军", "平", "宁", "超", "波", "洋", "浩", "宇",
    "子轩", "浩然", "宇轩", "俊杰", "子涵", "文博", "天佑", "煜城", "鹏飞", "俊驰", "鸿涛",
    "子墨", "俊逸", "文轩", "弘文", "子骞", "昊然", "泽宇", "思远", "文昊", "宇辰", "天磊",
];

static HANZI: &str = "的一是在不了有和人这中大为上个国我以要他时来用们生到作地于出就分对成\
会可主发年动同工也能下过子说产种面而方后多定行学法所民得经十三之进着等部度家电力里如水\
化高自二理起小物现实加量都两体制机当使点从业本去把性好应开它合还因由其些然前外天政四日\
那社义事平形相全表间样与关各重新线内数正心反你明看原又么利比或但质气第向道命此变条";

/// A random full name: one surname plus one given name. Passing a sex draws
/// the given name from that sex's table
pub fn full_name(rng: &mut Rng, sex: Option<Sex>) -> String {
    let surname = *rng.pick(SURNAMES);
    let given = match sex {
        Some(Sex::Female) => *rng.pick(FEMALE_GIVEN),
        Some(Sex::Male) => *rng.pick(MALE_GIVEN),
        None => {
            if rng.below(2) == 0 {
                *rng.pick(FEMALE_GIVEN)
            } else {
                *rng.pick(MALE_GIVEN)
            }
        }
    };
    format!("{surname}{given}")
}

/// A run of random everyday hanzi, between `min` and `max` characters long
pub fn hanzi_run(rng: &mut Rng, min: usize, max: usize) -> String {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let len = rng.range(min as u64, max as u64) as usize;
    let pool: Vec<char> = HANZI.chars().collect();
    (0..len).map(|_| *rng.pick(&pool)).collect()
}

/// A street address below the given area prefix, in the shape the cards use:
/// street, road, lane, building, and room
pub fn street_address(rng: &mut Rng, prefix: &str) -> String {
    format!(
        "{prefix}{}街道{}路{}弄{}号{}室",
        hanzi_run(rng, 2, 3),
        hanzi_run(rng, 2, 3),
        rng.range(10, 1000),
        rng.range(1, 10),
        rng.range(10, 1808),
    )
}

/// The residential address printed for a holder: a random street below their
/// registration area, or a fixed fallback when the area tables don't cover
/// the region code
pub fn address_for(rng: &mut Rng, id: &IdNumber) -> String {
    match area::address_info_for(id) {
        Some(info) => street_address(rng, &info.address),
        None => "上海市浦东新区塘桥街道蓝村路471弄10号1801室".to_string(),
    }
}

/// A random, checksum-valid ID number: a covered registration area, a birth
/// date for a holder between 18 and 60 years old, and a three-digit sequence
pub fn id_number(rng: &mut Rng, today: NaiveDate) -> IdNumber {
    let (region, _) = *rng.pick(COUNTIES);
    let age = rng.range(18, 60) as i32;
    let birth = NaiveDate::from_ymd_opt(
        today.year() - age,
        rng.range(1, 12) as u32,
        rng.range(1, 28) as u32,
    )
    .expect("days up to 28 exist in every month");
    let sequence = rng.range(1, 999) as u16;
    IdNumber::from_parts(region, birth, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idno::IdNumber;

    #[test]
    fn seeded_generators_repeat_their_sequence() {
        let mut a = Rng::seeded(42);
        let mut b = Rng::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let mut rng = Rng::seeded(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let value = rng.range(1, 3);
            assert!((1..=3).contains(&value));
            seen_min |= value == 1;
            seen_max |= value == 3;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn full_names_start_with_a_known_surname() {
        let mut rng = Rng::seeded(3);
        for _ in 0..32 {
            let name = full_name(&mut rng, None);
            assert!(SURNAMES.iter().any(|s| name.starts_with(s)));
        }
    }

    #[test]
    fn hanzi_runs_respect_their_bounds() {
        let mut rng = Rng::seeded(11);
        for _ in 0..64 {
            let run = hanzi_run(&mut rng, 2, 3);
            let len = run.chars().count();
            assert!((2..=3).contains(&len));
        }
    }

    #[test]
    fn generated_id_numbers_validate() {
        let mut rng = Rng::seeded(99);
        let today = NaiveDate::from_ymd_opt(2024, 12, 13).unwrap();
        for _ in 0..32 {
            let id = id_number(&mut rng, today);
            assert!(IdNumber::parse(id.as_str()).is_ok());
            let age = id.age_on(today);
            assert!((17..=60).contains(&age));
        }
    }

    #[test]
    fn addresses_carry_the_area_prefix() {
        let mut rng = Rng::seeded(5);
        let id = IdNumber::from_parts(
            310115,
            NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            123,
        );
        let address = address_for(&mut rng, &id);
        assert!(address.starts_with("上海市浦东新区"));
        assert!(address.ends_with("室"));
    }

    #[test]
    fn uncovered_regions_fall_back_to_the_fixed_address() {
        let mut rng = Rng::seeded(5);
        let id = IdNumber::from_parts(
            999999,
            NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            123,
        );
        assert_eq!(
            address_for(&mut rng, &id),
            "上海市浦东新区塘桥街道蓝村路471弄10号1801室"
        );
    }
}
