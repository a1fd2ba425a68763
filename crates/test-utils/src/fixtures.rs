//! Common test fixtures for AOD explorer tests.
//!
//! These are trimmed copies of what the AERONET web service returns, small
//! enough that every expected row can be enumerated in a test.

/// AOD download responses (`print_web_data_v3`).
pub mod aod {
    /// Level 1.5, all points, site GSFC, 1-2 June 2024.
    ///
    /// Four data lines:
    /// - 01/06 12:00:00: all seven selectable wavelengths valid
    /// - 01/06 13:00:00: 1020, 870, 500 and 440 nm valid
    /// - 02/06 09:30:00: all seven valid
    /// - 02/06 10:00:00: every AOD value missing (-999)
    ///
    /// 18 measurements in total across 3 timestamps.
    pub const SAMPLE_LEVEL15: &str = "\
AERONET Version 3;
GSFC
Version 3: AOD Level 1.5
The following data are automatically cloud cleared but may not have final calibration applied.  These data are not quality assured.
Contact: PI=Test PI; PI Email=pi@example.com
AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss),Day_of_Year,Day_of_Year(Fraction),AOD_1640nm,AOD_1020nm,AOD_870nm,AOD_675nm,AOD_500nm,AOD_440nm,AOD_380nm,AOD_340nm,Precipitable_Water(cm),440-870_Angstrom_Exponent,Data_Quality_Level,AERONET_Instrument_Number,Site_Latitude(Degrees),Site_Longitude(Degrees),Site_Elevation(m)
GSFC,01:06:2024,12:00:00,153,153.500000,0.031000,0.045000,0.060000,0.090000,0.150000,0.180000,0.210000,0.230000,2.105000,1.450000,lev15,1234,38.992500,-76.839833,87.000000
GSFC,01:06:2024,13:00:00,153,153.541667,-999.,0.050000,0.065000,-999.,0.160000,0.190000,-999.,-999.,2.110000,1.420000,lev15,1234,38.992500,-76.839833,87.000000
GSFC,02:06:2024,09:30:00,154,154.395833,0.020000,0.030000,0.040000,0.070000,0.110000,0.130000,0.150000,0.170000,1.980000,1.510000,lev15,1234,38.992500,-76.839833,87.000000
GSFC,02:06:2024,10:00:00,154,154.416667,-999.,-999.,-999.,-999.,-999.,-999.,-999.,-999.,-999.,-999.,lev15,1234,38.992500,-76.839833,87.000000
";

    /// Number of measurements in [`SAMPLE_LEVEL15`].
    pub const SAMPLE_LEVEL15_ROWS: usize = 18;

    /// Distinct timestamps with at least one valid value in [`SAMPLE_LEVEL15`].
    pub const SAMPLE_LEVEL15_TIMESTAMPS: usize = 3;

    /// Level 2.0 daily averages without a quality column.
    pub const SAMPLE_DAILY_LEVEL20: &str = "\
AERONET Version 3;
Mauna_Loa
Version 3: AOD Level 2.0
The following data are pre and post field calibrated, automatically cloud cleared and manually inspected.
Contact: PI=Test PI; PI Email=pi@example.com
Daily Averages,UNITS can be found at,,, https://aeronet.gsfc.nasa.gov/new_web/units.html
AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss),Day_of_Year,AOD_1020nm,AOD_870nm,AOD_500nm,AOD_440nm
Mauna_Loa,10:03:2023,00:00:00,69,0.010000,0.012000,0.020000,0.024000
Mauna_Loa,11:03:2023,00:00:00,70,0.011000,-999.,0.021000,0.026000
";

    pub const SAMPLE_DAILY_LEVEL20_ROWS: usize = 7;

    /// Header only: the site has no data in the requested range.
    pub const NO_DATA: &str = "\
AERONET Version 3;
GSFC
Version 3: AOD Level 2.0
Contact: PI=Test PI; PI Email=pi@example.com
AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss),Day_of_Year,AOD_1020nm,AOD_870nm,AOD_500nm,AOD_440nm
";

    /// What the service sends back when it cannot answer the query.
    pub const HTML_ERROR: &str = "\
<html><head><title>AERONET</title></head>
<body>Error: Site name is not valid</body></html>
";

    /// Header without a time column.
    pub const MISSING_TIME_COLUMN: &str = "\
AERONET Version 3;
GSFC
AERONET_Site,Date(dd:mm:yyyy),Day_of_Year,AOD_500nm,AOD_440nm
GSFC,01:06:2024,153,0.15,0.18
";

    /// Header without any AOD column the explorer recognises.
    pub const MISSING_AOD_COLUMNS: &str = "\
AERONET Version 3;
GSFC
AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss),Precipitable_Water(cm)
GSFC,01:06:2024,12:00:00,2.1
";

    /// Second data line carries an impossible date.
    pub const MALFORMED_DATE: &str = "\
AERONET Version 3;
GSFC
AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss),AOD_500nm,AOD_440nm
GSFC,01:06:2024,12:00:00,0.15,0.18
GSFC,41:06:2024,13:00:00,0.16,0.19
";
}

/// Site list responses (`aeronet_locations_v3.txt`).
pub mod sites {
    /// Four sites; two header lines precede the data.
    pub const SAMPLE_LOCATIONS: &str = "\
AERONET_Database_Site_List,Num=4,Date_Generated=18:10:2026
Site_Name,Longitude(decimal_degrees),Latitude(decimal_degrees),Elevation(meters)
Cart_Site,-97.485556,36.606667,318.000000
GSFC,-76.839833,38.992500,87.000000
Mauna_Loa,-155.576000,19.536000,3402.000000
Beijing,116.381000,39.977000,
";

    pub const SAMPLE_LOCATIONS_COUNT: usize = 4;
}
