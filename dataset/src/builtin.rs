//! Regions compiled into the quiz.

use city_quiz_core::{LatLng, Point, PointId, Region, SnapThreshold, Viewport};

use crate::CatalogError;

/// Static description of a region prior to validation.
pub(crate) struct RegionData {
    pub(crate) code: &'static str,
    pub(crate) name: &'static str,
    pub(crate) center: (f64, f64),
    pub(crate) zoom: u8,
    pub(crate) snap_threshold_km: f64,
    pub(crate) points: &'static [(u32, &'static str, f64, f64)],
}

impl RegionData {
    pub(crate) fn build(&self) -> Result<Region, CatalogError> {
        let points = self
            .points
            .iter()
            .map(|&(id, name, lat, lng)| Point::new(PointId::new(id), name, LatLng::new(lat, lng)))
            .collect();
        let viewport = Viewport::new(LatLng::new(self.center.0, self.center.1), self.zoom);
        let threshold = SnapThreshold::from_kilometers(self.snap_threshold_km).ok_or_else(|| {
            CatalogError::InvalidThreshold {
                code: self.code.to_owned(),
            }
        })?;
        Ok(Region::new(self.code, self.name, points, viewport, threshold)?)
    }
}

pub(crate) const ESTONIA: RegionData = RegionData {
    code: "ee",
    name: "Estonia",
    center: (58.59, 25.01),
    zoom: 7,
    snap_threshold_km: 50.0,
    points: &[
        (1, "Tallinn", 59.4370, 24.7536),
        (2, "Tartu", 58.3780, 26.7290),
        (3, "Narva", 59.3796, 28.1991),
        (4, "Pärnu", 58.3859, 24.4965),
        (5, "Viljandi", 58.3639, 25.5922),
        (6, "Rakvere", 59.3469, 26.3571),
        (7, "Kuressaare", 58.2536, 22.4858),
        (8, "Võru", 57.8336, 26.9903),
        (9, "Haapsalu", 58.9469, 23.5394),
        (10, "Paide", 58.8856, 25.5561),
        (11, "Jõhvi", 59.3592, 27.4128),
        (12, "Valga", 57.7769, 26.0469),
        (13, "Kärdla", 59.0019, 22.7492),
        (14, "Põlva", 58.0536, 27.0583),
        (15, "Rapla", 59.0069, 24.7967),
        (16, "Jõgeva", 58.7458, 26.3958),
        (17, "Türi", 58.8092, 25.4319),
        (18, "Elva", 58.2258, 26.4175),
        (19, "Saue", 59.3242, 24.5572),
        (20, "Põltsamaa", 58.6519, 25.9686),
    ],
};

pub(crate) const UKRAINE: RegionData = RegionData {
    code: "ua",
    name: "Ukraine",
    center: (48.3794, 31.1656),
    zoom: 6,
    snap_threshold_km: 75.0,
    points: &[
        (1, "Kyiv", 50.4501, 30.5234),
        (2, "Kharkiv", 49.9935, 36.2304),
        (3, "Odesa", 46.4825, 30.7233),
        (4, "Dnipro", 48.4647, 35.0462),
        (5, "Lviv", 49.8397, 24.0297),
        (6, "Zaporizhzhia", 47.8388, 35.1396),
        (7, "Kryvyi Rih", 47.9105, 33.3918),
        (8, "Mykolaiv", 46.9750, 31.9946),
        (9, "Vinnytsia", 49.2331, 28.4682),
        (10, "Poltava", 49.5883, 34.5514),
        (11, "Chernihiv", 51.4982, 31.2893),
        (12, "Cherkasy", 49.4444, 32.0598),
        (13, "Zhytomyr", 50.2547, 28.6587),
        (14, "Sumy", 50.9077, 34.7981),
        (15, "Khmelnytskyi", 49.4229, 26.9871),
        (16, "Chernivtsi", 48.2915, 25.9403),
        (17, "Rivne", 50.6199, 26.2516),
        (18, "Ivano-Frankivsk", 48.9226, 24.7111),
        (19, "Ternopil", 49.5535, 25.5948),
        (20, "Lutsk", 50.7472, 25.3254),
        (21, "Uzhhorod", 48.6208, 22.2879),
        (22, "Kherson", 46.6354, 32.6169),
    ],
};

pub(crate) const ALL: [RegionData; 2] = [ESTONIA, UKRAINE];
