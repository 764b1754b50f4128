mod test_fixed;
