/// Station names with their long-run mean temperature in °C
pub const STATIONS: &[(&str, f64)] = &[
    ("Abha", 18.0),
    ("São Paulo", 19.7),
    ("İzmir", 17.9),
    ("Ahvaz", 25.4),
    ("Amsterdam", 10.2),
    ("Arkhangelsk", 1.3),
    ("Auckland", 15.2),
    ("Bangkok", 28.6),
    ("Beirut", 20.9),
    ("Birao", 26.5),
    ("Bosaso", 30.0),
    ("Brussels", 10.5),
    ("Cabo San Lucas", 23.9),
    ("Charlotte", 16.1),
    ("Christchurch", 12.2),
    ("Cracow", 9.3),
    ("Dar es Salaam", 25.8),
    ("Dili", 26.6),
    ("Dunedin", 11.1),
    ("Erbil", 19.5),
    ("Fukuoka", 17.0),
    ("George Town", 27.9),
    ("Hamburg", 9.7),
    ("Hat Yai", 27.0),
    ("Hong Kong", 23.3),
    ("Irkutsk", 1.0),
    ("Johannesburg", 15.5),
    ("Kano", 26.4),
    ("Kinshasa", 25.3),
    ("Kyiv", 8.4),
    ("Lake Tekapo", 8.7),
    ("Livingstone", 21.8),
    ("Luanda", 25.8),
    ("Mahajanga", 26.3),
    ("Mandalay", 28.0),
    ("Medan", 26.5),
    ("Milan", 13.0),
    ("Moncton", 6.1),
    ("Mzuzu", 17.7),
    ("Nashville", 15.4),
    ("Niamey", 29.3),
    ("Odesa", 10.7),
    ("Ouagadougou", 28.3),
    ("Palmerston North", 13.2),
    ("Phnom Penh", 28.3),
    ("Port Sudan", 28.4),
    ("Pretoria", 18.2),
    ("Riyadh", 26.0),
    ("Salt Lake City", 11.6),
    ("San Salvador", 23.1),
    ("Ségou", 28.0),
    ("Sofia", 10.6),
    ("Suva", 25.6),
    ("Tamale", 27.9),
    ("Tehran", 17.0),
    ("Toamasina", 23.4),
    ("Tucson", 20.9),
    ("Valletta", 18.8),
    ("Virginia Beach", 15.8),
    ("Wichita", 13.9),
    ("Yaoundé", 23.8),
];
