mod test_freshness;
