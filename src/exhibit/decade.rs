use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// Decades offered by the picker, in display order
pub const SUPPORTED_DECADES: [i32; 7] = [1950, 1960, 1970, 1980, 1990, 2000, 2010];

pub const DEFAULT_DECADE: i32 = 1980;

/// First year of a ten-year period (1980 stands for 1980-1989)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Decade(i32);

impl Decade {
    pub fn new(start: i32) -> Result<Self> {
        if start % 10 != 0 {
            return Err(anyhow::anyhow!(
                "{} is not a decade start (expected a multiple of ten)",
                start
            ));
        }
        if start > i32::MAX - 9 {
            return Err(anyhow::anyhow!("{} is too late to hold a full decade", start));
        }
        Ok(Decade(start))
    }

    pub fn start(&self) -> i32 {
        self.0
    }

    pub fn end(&self) -> i32 {
        self.0 + 9
    }

    pub fn contains(&self, year: i64) -> bool {
        (i64::from(self.start())..=i64::from(self.end())).contains(&year)
    }

    /// Encyclopedia title for the decade, e.g. "1980s"
    pub fn wiki_title(&self) -> String {
        format!("{}s", self.0)
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_DECADES.contains(&self.0)
    }

    /// Bundled summary for the decade, if one was written for it
    pub fn summary(&self) -> Option<&'static str> {
        DECADE_SUMMARIES
            .iter()
            .find(|(decade, _)| *decade == self.0)
            .map(|(_, text)| *text)
    }
}

impl Default for Decade {
    fn default() -> Self {
        Decade(DEFAULT_DECADE)
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Parse a picker value such as "1980" or "1980s", rejecting decades the picker does not offer
pub fn parse_supported_decade(raw: &str) -> Result<Decade, String> {
    let digits = raw.trim().trim_end_matches('s');
    let start: i32 = digits
        .parse()
        .map_err(|_| format!("'{raw}' is not a decade"))?;
    let decade = Decade::new(start).map_err(|e| e.to_string())?;
    if !decade.is_supported() {
        let offered: Vec<String> = SUPPORTED_DECADES.iter().map(|d| d.to_string()).collect();
        return Err(format!(
            "decade {start} is not offered, pick one of {}",
            offered.join(", ")
        ));
    }
    Ok(decade)
}

const DECADE_SUMMARIES: [(i32, &str); 7] = [
    (
        1950,
        "Tras la Segunda Guerra Mundial, el mundo entró en la Guerra Fría. EE. UU. y la URSS lideraron un orden bipolar mientras Europa se reconstruía. Crecieron el rock ’n’ roll, la televisión y el consumo masivo.",
    ),
    (
        1960,
        "Década de revolución cultural y protestas sociales. La carrera espacial culminó con el hombre en la Luna. Nacieron los movimientos por los derechos civiles y el hippismo.",
    ),
    (
        1970,
        "Años de crisis energética y tensiones políticas. La música disco, el punk y el rock dominaron la cultura. Se avanzó en tecnología y se consolidó la computación personal.",
    ),
    (
        1980,
        "Era de modernización tecnológica y cultura pop global. Nacieron los videojuegos, MTV y los primeros ordenadores domésticos. Se intensificó la Guerra Fría y comenzó la globalización.",
    ),
    (
        1990,
        "Fin de la Guerra Fría y expansión del internet. La cultura se volvió digital y multicultural. Surgieron nuevas democracias y una economía más globalizada.",
    ),
    (
        2000,
        "Comienzo del siglo XXI marcado por los atentados del 11-S. Auge de la tecnología móvil y las redes sociales. Se aceleró la conexión digital y la cultura global.",
    ),
    (
        2010,
        "Década de innovación tecnológica y conciencia social. Expansión del streaming, el smartphone y los movimientos globales. El mundo vivió cambios políticos, climáticos y digitales profundos.",
    ),
];
