//! Shared message fixtures

#![allow(dead_code)]

/// DFT^P03 message touching every segment type with a field layout
pub const DFT_MESSAGE: &str = concat!(
    "MSH|^~\\&|ECLINIC|FACILITY|BILLING|CLEARING|20250415073000||DFT^P03|MSG00001|P|2.3\n",
    "EVN|P03|20250415073000\n",
    "PID|1|12345|12345||BURROWS^MARGARET^^^||19450612|F||W|12 MAIN ST^^SPRINGFIELD^IL^62701||(217)555-0100||ENG|W\n",
    "PV1|1|O|CLINIC^101||||1234^JONES^ANN||||||||||||V5678\n",
    "FT1|1|TX001|20250410|20250415||CG|99213|OFFICE VISIT EST PATIENT|OFFICE VISIT EST PATIENT|1|125.00|1|MAIN CLINIC||||||E11.9^^I10~I10^^I10|SMITH^JOHN||||99213|99213|25^^^\n",
    "FT1|2|TX002|20250409|20250415||CG|36415|VENIPUNCTURE||1|25.50\n",
    "DG1|1|I10|E11.9^^I10~I10^^I10|TYPE 2 DIABETES|20250410|F\n",
    "GT1|1|G001|BURROWS^MARGARET||12 MAIN ST^^SPRINGFIELD^IL^62701|(217)555-0100|||||123-45-6789\n",
    "IN1|1|PLAN01|POL123|MEDICARE|PO BOX 1^^CHICAGO^IL^60601|||||||||||BURROWS^MARGARET||19450612\n",
    "PR1|1|99213|OFFICE VISIT|20250410||1\n",
    "ZZZ|foo|bar",
);
