/// One air-quality reading: a UTC timestamp and a pollutant concentration.
///
/// `datetime` carries the upstream API's UTC string verbatim; it is stored
/// and rendered without ever being parsed into a datetime type, so the text
/// a client sees is exactly the text the API returned.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Measurement {
    pub datetime: String,
    pub value: f64,
}
