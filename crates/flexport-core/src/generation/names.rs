//! Ship name generation

use rand::Rng;

/// Generate a random ship name such as "Pacific Voyager".
pub fn generate_ship_name(rng: &mut impl Rng) -> String {
    let first = FIRST_WORDS[rng.gen_range(0..FIRST_WORDS.len())];
    let second = SECOND_WORDS[rng.gen_range(0..SECOND_WORDS.len())];
    format!("{} {}", first, second)
}

static FIRST_WORDS: &[&str] = &[
    // Seas and regions
    "Pacific",
    "Atlantic",
    "Baltic",
    "Arctic",
    "Coral",
    "Aegean",
    "Caspian",
    "Nordic",
    "Meridian",
    "Equator",
    // Qualities
    "Ever",
    "Swift",
    "Golden",
    "Silver",
    "Northern",
    "Southern",
    "Eastern",
    "Western",
    "Iron",
    "Blue",
];

static SECOND_WORDS: &[&str] = &[
    "Voyager",
    "Star",
    "Dawn",
    "Horizon",
    "Pioneer",
    "Trader",
    "Spirit",
    "Endeavour",
    "Fortune",
    "Mariner",
    "Crest",
    "Harmony",
    "Courier",
    "Tide",
    "Venture",
    "Falcon",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_name_has_two_words() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let name = generate_ship_name(&mut rng);
            assert_eq!(name.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_names_are_deterministic_per_seed() {
        let a = generate_ship_name(&mut StdRng::seed_from_u64(7));
        let b = generate_ship_name(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
