//! Labeled patterns for loan application fields.
//!
//! Each pattern is a label, an optional `:` or `-`, optional whitespace and the
//! value in capture group 1. All patterns are case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Free text: rest of the line after the label
    pub static ref FULL_NAME: Regex = Regex::new(
        r"(?i)Name[:\-]?\s*(.+)"
    ).unwrap();

    pub static ref ADDRESS: Regex = Regex::new(
        r"(?i)Address[:\-]?\s*(.+)"
    ).unwrap();

    pub static ref ORGANIZATION: Regex = Regex::new(
        r"(?i)Employer[:\-]?\s*(.+)"
    ).unwrap();

    // DD/MM/YYYY or DD-MM-YYYY
    pub static ref DOB: Regex = Regex::new(
        r"(?i)Date of Birth[:\-]?\s*(\d{2}[/\-]\d{2}[/\-]\d{4})"
    ).unwrap();

    pub static ref GENDER: Regex = Regex::new(
        r"(?i)Gender[:\-]?\s*(Male|Female|Other)"
    ).unwrap();

    // PAN: 5 letters, 4 digits, 1 letter
    pub static ref PAN: Regex = Regex::new(
        r"(?i)PAN[:\-]?\s*([A-Z]{5}\d{4}[A-Z])"
    ).unwrap();

    // Aadhaar: 3 groups of 4 digits; the label often loses its final "r" in OCR
    pub static ref AADHAAR: Regex = Regex::new(
        r"(?i)Aadhaar?[:\-]?\s*(\d{4} \d{4} \d{4})"
    ).unwrap();

    // Exactly 10 digits
    pub static ref MOBILE: Regex = Regex::new(
        r"(?i)Mobile[:\-]?\s*(\d{10})(?:\D|$)"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"(?i)Email[:\-]?\s*([\w.\-]+@[\w.\-]+)"
    ).unwrap();

    pub static ref EMPLOYMENT_TYPE: Regex = Regex::new(
        r"(?i)Employment Type[:\-]?\s*(Salaried|Self-Employed|Business)"
    ).unwrap();

    // Amounts: optional currency, digits with optional thousands separators
    pub static ref MONTHLY_INCOME: Regex = Regex::new(
        r"(?i)Income[:\-]?\s*(?:₹|Rs\.?|INR)?\s*(\d[\d,]*)"
    ).unwrap();

    pub static ref LOAN_AMOUNT: Regex = Regex::new(
        r"(?i)Loan Amount[:\-]?\s*(?:₹|Rs\.?|INR)?\s*(\d[\d,]*)"
    ).unwrap();

    // Only the number is captured; the unit is optional
    pub static ref LOAN_TENURE: Regex = Regex::new(
        r"(?i)Tenure[:\-]?\s*(\d+)\s*(?:months|years)?"
    ).unwrap();
}
