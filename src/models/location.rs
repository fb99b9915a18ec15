use serde::Serialize;

/// Подсказка места в формате LocationIQ (координаты строками, как у них).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KnownLocation {
    pub place_id: &'static str,
    pub display_name: &'static str,
    pub lat: &'static str,
    pub lon: &'static str,
}

const fn known(
    place_id: &'static str,
    display_name: &'static str,
    lat: &'static str,
    lon: &'static str,
) -> KnownLocation {
    KnownLocation {
        place_id,
        display_name,
        lat,
        lon,
    }
}

/// Популярные кайт-споты для подсказок без внешнего сервиса.
pub const KNOWN_LOCATIONS: [KnownLocation; 10] = [
    known("1", "Tarifa, Cádiz, Andalusia, Spain", "36.0128", "-5.6012"),
    known("2", "Cape Town, Western Cape, South Africa", "-33.9249", "18.4241"),
    known("3", "Maui, Hawaii, USA", "20.7984", "-156.3319"),
    known("4", "Cabarete, Puerto Plata, Dominican Republic", "19.7667", "-70.4167"),
    known("5", "Essaouira, Morocco", "31.5125", "-9.7700"),
    known("6", "Fuerteventura, Canary Islands, Spain", "28.3587", "-14.0538"),
    known("7", "Jericoacoara, Ceará, Brazil", "-2.7964", "-40.5117"),
    known("8", "Mui Ne, Phan Thiet, Vietnam", "10.9333", "108.2833"),
    known("9", "Hood River, Oregon, USA", "45.7054", "-121.5215"),
    known("10", "Zanzibar, Tanzania", "-6.1659", "39.3621"),
];

/// Сколько первых мест из [`KNOWN_LOCATIONS`] отдаётся, когда LocationIQ недоступен.
pub const FALLBACK_LOCATION_COUNT: usize = 6;

/// Места, в названии которых встречается `query` без учёта регистра.
pub fn filter_locations(
    locations: &[KnownLocation],
    query: &str,
    limit: usize,
) -> Vec<KnownLocation> {
    let query = query.to_lowercase();
    locations
        .iter()
        .filter(|location| location.display_name.to_lowercase().contains(&query))
        .take(limit)
        .copied()
        .collect()
}
