mod test_distance;
